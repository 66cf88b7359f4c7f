//! Access policy for profile-scoped operations.
//!
//! One pure decision function covers every handler. Callers perform the
//! role and link lookups; the policy only judges them.

use shared::{LinkPermission, UserRole};

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    /// Denied, with a human-readable reason suitable for a 403 body.
    Denied(String),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }
}

/// Decide whether a principal may act on a profile at `required` level.
///
/// - Admins are allowed regardless of link state.
/// - Pending and rejected accounts are denied outright.
/// - Approved accounts need a link; an `edit` link satisfies `read`
///   (edit implies read), a `read` link never satisfies `edit`.
pub fn authorize(
    role: UserRole,
    link: Option<LinkPermission>,
    required: LinkPermission,
) -> AccessDecision {
    if role == UserRole::Admin {
        return AccessDecision::Allowed;
    }

    if role != UserRole::Approved {
        return AccessDecision::Denied("account is not approved".to_string());
    }

    match link {
        None => AccessDecision::Denied("no access to this profile".to_string()),
        Some(permission) if permission.allows(required) => AccessDecision::Allowed,
        Some(_) => {
            AccessDecision::Denied("read-only access; edit permission required".to_string())
        }
    }
}

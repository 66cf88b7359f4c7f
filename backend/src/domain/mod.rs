//! # Domain Module
//!
//! Business logic for the net-worth tracker, independent of HTTP and of
//! the concrete storage backend.
//!
//! - **access_policy**: the pure role/link authorization decision
//! - **date_resolver**: exact → before-date → nothing resolution
//! - **entry_service**: snapshot creation and date-indexed reads
//! - **profile_service**: profile CRUD and creator links
//! - **user_service**: registration, login, approval workflow

pub mod access_policy;
pub mod date_resolver;
pub mod entry_service;
pub mod profile_service;
pub mod user_service;

pub use access_policy::{authorize, AccessDecision};
pub use date_resolver::{DateResolver, ResolvedEntry};
pub use entry_service::EntryService;
pub use profile_service::ProfileService;
pub use user_service::{ApprovalOutcome, UserService};

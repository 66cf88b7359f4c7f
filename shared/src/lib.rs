use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wire format for entry dates (`YYYY-MM-DD`).
pub const ENTRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Maximum length of a profile name after trimming.
pub const MAX_PROFILE_NAME_LENGTH: usize = 64;

/// Global role of a user account.
///
/// New accounts start as `Pending` until an admin approves or rejects them.
/// `Admin` bypasses per-profile links entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Pending,
    Approved,
    Admin,
    Rejected,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Pending => "pending",
            UserRole::Approved => "approved",
            UserRole::Admin => "admin",
            UserRole::Rejected => "rejected",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UserRole::Pending),
            "approved" => Ok(UserRole::Approved),
            "admin" => Ok(UserRole::Admin),
            "rejected" => Ok(UserRole::Rejected),
            other => Err(format!("Unknown user role: {}", other)),
        }
    }
}

/// Permission level granted by a profile link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPermission {
    Read,
    Edit,
}

impl LinkPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkPermission::Read => "read",
            LinkPermission::Edit => "edit",
        }
    }

    /// Whether a link at this level satisfies the `required` level.
    /// Edit implies read; read never implies edit.
    pub fn allows(&self, required: LinkPermission) -> bool {
        match required {
            LinkPermission::Read => true,
            LinkPermission::Edit => *self == LinkPermission::Edit,
        }
    }
}

impl fmt::Display for LinkPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(LinkPermission::Read),
            "edit" => Ok(LinkPermission::Edit),
            other => Err(format!("Unknown link permission: {}", other)),
        }
    }
}

/// A named container of financial entries (e.g., "Personal", "Family").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub created_at: String, // RFC 3339 timestamp
    pub updated_at: String, // RFC 3339 timestamp
}

/// A user account (principal).
///
/// The password hash never travels in this type; credential lookups are a
/// storage-layer concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: String, // RFC 3339 timestamp
    pub updated_at: String, // RFC 3339 timestamp
}

/// Grant of read or edit access from a user to a profile.
///
/// Absence of a link means no access at all for non-admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileLink {
    pub user_id: String,
    pub profile_id: String,
    pub permission: LinkPermission,
    pub created_at: String, // RFC 3339 timestamp
}

/// One dated snapshot of asset holdings for a profile.
///
/// At most one entry exists per profile per calendar day. All monetary
/// fields are non-negative and carry at most 2 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub profile_id: String,
    /// Calendar day of the snapshot (`YYYY-MM-DD`)
    pub entry_date: String,
    pub cash: f64,
    pub checking: f64,
    pub savings: f64,
    pub fixed_deposits: f64,
    pub brokerage: f64,
    pub stocks: f64,
    pub bonds: f64,
    pub mutual_funds: f64,
    pub etfs: f64,
    pub retirement: f64,
    pub pension: f64,
    pub crypto: f64,
    pub gold: f64,
    pub real_estate: f64,
    pub vehicles: f64,
    pub collectibles: f64,
    pub receivables: f64,
    pub other_assets: f64,
    pub created_at: String, // RFC 3339 timestamp
    pub updated_at: String, // RFC 3339 timestamp
}

impl Entry {
    /// Total net worth of the snapshot (sum of all asset fields).
    pub fn total(&self) -> f64 {
        self.asset_values().iter().sum()
    }

    /// The 18 monetary fields in declaration order.
    pub fn asset_values(&self) -> [f64; 18] {
        [
            self.cash,
            self.checking,
            self.savings,
            self.fixed_deposits,
            self.brokerage,
            self.stocks,
            self.bonds,
            self.mutual_funds,
            self.etfs,
            self.retirement,
            self.pension,
            self.crypto,
            self.gold,
            self.real_estate,
            self.vehicles,
            self.collectibles,
            self.receivables,
            self.other_assets,
        ]
    }
}

/// Round a non-negative monetary value half-up to the nearest 0.01.
///
/// Applied on every write so stored values never accumulate more precision
/// than currency minor units.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Check that a string is a complete `YYYY-MM-DD` calendar date.
///
/// Re-formats the parsed date and compares, so non-padded variants like
/// `2024-1-5` are rejected along with impossible dates.
pub fn is_valid_entry_date(date: &str) -> bool {
    match chrono::NaiveDate::parse_from_str(date, ENTRY_DATE_FORMAT) {
        Ok(parsed) => parsed.format(ENTRY_DATE_FORMAT).to_string() == date,
        Err(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Request for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response (register and login).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    pub user: UserProfile,
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// Request for creating a new profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateProfileRequest {
    pub name: String,
}

/// Request for renaming an existing profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateProfileRequest {
    pub name: String,
}

/// Response after creating or updating a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub success_message: String,
}

/// Response containing a list of profiles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileListResponse {
    pub profiles: Vec<Profile>,
}

/// Response after deleting a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteProfileResponse {
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// Request for creating (or re-inserting) an entry.
///
/// Monetary fields default to 0 when absent; a missing optional field is
/// never a validation error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateEntryRequest {
    /// Calendar day of the snapshot (`YYYY-MM-DD`), required.
    pub entry_date: String,
    #[serde(default)]
    pub cash: f64,
    #[serde(default)]
    pub checking: f64,
    #[serde(default)]
    pub savings: f64,
    #[serde(default)]
    pub fixed_deposits: f64,
    #[serde(default)]
    pub brokerage: f64,
    #[serde(default)]
    pub stocks: f64,
    #[serde(default)]
    pub bonds: f64,
    #[serde(default)]
    pub mutual_funds: f64,
    #[serde(default)]
    pub etfs: f64,
    #[serde(default)]
    pub retirement: f64,
    #[serde(default)]
    pub pension: f64,
    #[serde(default)]
    pub crypto: f64,
    #[serde(default)]
    pub gold: f64,
    #[serde(default)]
    pub real_estate: f64,
    #[serde(default)]
    pub vehicles: f64,
    #[serde(default)]
    pub collectibles: f64,
    #[serde(default)]
    pub receivables: f64,
    #[serde(default)]
    pub other_assets: f64,
}

impl CreateEntryRequest {
    /// The 18 monetary fields with their names, for validation messages.
    pub fn named_values(&self) -> [(&'static str, f64); 18] {
        [
            ("cash", self.cash),
            ("checking", self.checking),
            ("savings", self.savings),
            ("fixed_deposits", self.fixed_deposits),
            ("brokerage", self.brokerage),
            ("stocks", self.stocks),
            ("bonds", self.bonds),
            ("mutual_funds", self.mutual_funds),
            ("etfs", self.etfs),
            ("retirement", self.retirement),
            ("pension", self.pension),
            ("crypto", self.crypto),
            ("gold", self.gold),
            ("real_estate", self.real_estate),
            ("vehicles", self.vehicles),
            ("collectibles", self.collectibles),
            ("receivables", self.receivables),
            ("other_assets", self.other_assets),
        ]
    }
}

/// Response after creating or re-inserting an entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryResponse {
    pub entry: Entry,
    pub success_message: String,
}

/// Response for single-entry lookups (`latest`, `by-date`, `before-date`).
///
/// Absence of a row is data, not an error: `entry` is null with status 200.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryLookupResponse {
    pub entry: Option<Entry>,
}

/// Response containing the full set of entry dates, descending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryDatesResponse {
    pub dates: Vec<String>,
}

/// Response containing all entries for a profile, descending by date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryListResponse {
    pub entries: Vec<Entry>,
}

/// Response after deleting an entry by date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteEntryResponse {
    pub deleted: bool,
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// Role an admin may assign when approving a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalRole {
    Approved,
    Admin,
}

impl From<ApprovalRole> for UserRole {
    fn from(role: ApprovalRole) -> Self {
        match role {
            ApprovalRole::Approved => UserRole::Approved,
            ApprovalRole::Admin => UserRole::Admin,
        }
    }
}

/// One profile grant in an approval request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLinkGrant {
    pub profile_id: String,
    pub permission: LinkPermission,
}

/// Request body for `POST /api/admin/users/:id/approve`.
///
/// `profileLinks` may be empty or absent: the approved user then starts
/// without profile access and is expected to create their own profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApproveUserRequest {
    pub role: ApprovalRole,
    #[serde(default)]
    pub profile_links: Vec<ProfileLinkGrant>,
}

/// Response after approving a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApproveUserResponse {
    pub user: UserProfile,
    pub links_created: usize,
    pub success_message: String,
}

/// Response after rejecting a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RejectUserResponse {
    pub user: UserProfile,
    pub success_message: String,
}

/// Response listing users awaiting approval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingUsersResponse {
    pub users: Vec<UserProfile>,
}

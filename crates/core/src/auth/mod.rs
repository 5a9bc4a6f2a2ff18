//! User roles and the capability table that gates operator actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User roles known to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UserRole {
    /// Full access including user administration and period closing.
    Admin,
    /// Ledger capture, chart of accounts, and the posting workflow.
    Accountant,
    /// Ledger capture only.
    Staff,
    /// Read-only access.
    Viewer,
}

/// An action the UI or CLI may offer to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create, edit, and deactivate users.
    ManageUsers,
    /// Maintain general and detail accounts.
    ManageAccounts,
    /// Submit ledger batches.
    CreateLedger,
    /// Read ledger entries.
    ViewLedger,
    /// Post Buku Besar.
    PostBukuBesar,
    /// Unpost Buku Besar.
    UnpostBukuBesar,
    /// Post Neraca Detail.
    PostNeracaDetail,
    /// Unpost Neraca Detail.
    UnpostNeracaDetail,
    /// Post Neraca Balance.
    PostNeracaBalance,
    /// Post Neraca Akhir, closing the period.
    CloseNeracaAkhir,
    /// Export PDF/XLSX reports.
    ExportReports,
}

/// A role string the backend sent that this client does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown user role: {0}")]
pub struct UnknownRole(pub String);

const ADMIN: &[Capability] = &[
    Capability::ManageUsers,
    Capability::ManageAccounts,
    Capability::CreateLedger,
    Capability::ViewLedger,
    Capability::PostBukuBesar,
    Capability::UnpostBukuBesar,
    Capability::PostNeracaDetail,
    Capability::UnpostNeracaDetail,
    Capability::PostNeracaBalance,
    Capability::CloseNeracaAkhir,
    Capability::ExportReports,
];

const ACCOUNTANT: &[Capability] = &[
    Capability::ManageAccounts,
    Capability::CreateLedger,
    Capability::ViewLedger,
    Capability::PostBukuBesar,
    Capability::UnpostBukuBesar,
    Capability::PostNeracaDetail,
    Capability::UnpostNeracaDetail,
    Capability::PostNeracaBalance,
    Capability::ExportReports,
];

const STAFF: &[Capability] = &[
    Capability::CreateLedger,
    Capability::ViewLedger,
    Capability::ExportReports,
];

const VIEWER: &[Capability] = &[Capability::ViewLedger, Capability::ExportReports];

impl UserRole {
    /// Every role, most privileged first.
    pub const ALL: [Self; 4] = [Self::Admin, Self::Accountant, Self::Staff, Self::Viewer];

    /// Returns the capability set granted to this role.
    #[must_use]
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::Admin => ADMIN,
            Self::Accountant => ACCOUNTANT,
            Self::Staff => STAFF,
            Self::Viewer => VIEWER,
        }
    }

    /// Returns true if this role holds `capability`.
    #[must_use]
    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Accountant => "accountant",
            Self::Staff => "staff",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" | "administrator" | "super_admin" | "superadmin" => Ok(Self::Admin),
            "accountant" | "akuntan" => Ok(Self::Accountant),
            "staff" | "user" => Ok(Self::Staff),
            "viewer" => Ok(Self::Viewer),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ManageUsers => "manage users",
            Self::ManageAccounts => "manage accounts",
            Self::CreateLedger => "create ledger entries",
            Self::ViewLedger => "view ledger entries",
            Self::PostBukuBesar => "post buku besar",
            Self::UnpostBukuBesar => "unpost buku besar",
            Self::PostNeracaDetail => "post neraca detail",
            Self::UnpostNeracaDetail => "unpost neraca detail",
            Self::PostNeracaBalance => "post neraca balance",
            Self::CloseNeracaAkhir => "post neraca akhir",
            Self::ExportReports => "export reports",
        };
        f.write_str(name)
    }
}

//! Account: the tenant root, identified by an email address

use serde::{Deserialize, Serialize};

use super::fields::{non_null, Update};
use super::{Email, Entity};

/// Account verification state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Verified,
    Pending,
    Suspended,
}

impl AccountStatus {
    /// Stored column value, the same as the serialized name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Pending => "pending",
            Self::Suspended => "suspended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: i64,
    pub email: Email,
    pub google_id: Option<String>,
    pub status: AccountStatus,
}

/// POST body. No status: new accounts always start pending.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAccount {
    pub email: Email,
    #[serde(default)]
    pub google_id: Option<String>,
}

/// PATCH body
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountPatch {
    #[serde(default, deserialize_with = "non_null")]
    pub email: Option<Email>,
    #[serde(default)]
    pub google_id: Update<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub status: Option<AccountStatus>,
}

impl Entity for Account {
    const KIND: &'static str = "Account";
    const COLLECTION: &'static str = "accounts";

    type New = NewAccount;
    type Patch = AccountPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn create(id: i64, new: NewAccount) -> Self {
        Self {
            id,
            email: new.email,
            google_id: new.google_id,
            status: AccountStatus::Pending,
        }
    }

    fn apply(&mut self, patch: AccountPatch) {
        let AccountPatch {
            email,
            google_id,
            status,
        } = patch;

        if let Some(email) = email {
            self.email = email;
        }
        google_id.apply_to(&mut self.google_id);
        if let Some(status) = status {
            self.status = status;
        }
    }
}

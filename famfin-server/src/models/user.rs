//! User: a person acting under an account

use serde::{Deserialize, Serialize};

use super::fields::{lax, non_null, Update};
use super::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    FamilyManager,
    FamilyMember,
    FinancialProfessional,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FamilyManager => "family_manager",
            Self::FamilyMember => "family_member",
            Self::FinancialProfessional => "financial_professional",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub account_id: i64,
    #[serde(rename = "type")]
    pub kind: UserType,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    #[serde(deserialize_with = "lax::int")]
    pub account_id: i64,
    #[serde(rename = "type")]
    pub kind: UserType,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// PATCH body. `account_id` is not part of the changeset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserPatch {
    #[serde(rename = "type", default, deserialize_with = "non_null")]
    pub kind: Option<UserType>,
    #[serde(default)]
    pub first_name: Update<String>,
    #[serde(default)]
    pub last_name: Update<String>,
    #[serde(default)]
    pub logo_url: Update<String>,
}

impl Entity for User {
    const KIND: &'static str = "User";
    const COLLECTION: &'static str = "users";

    type New = NewUser;
    type Patch = UserPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn create(id: i64, new: NewUser) -> Self {
        Self {
            id,
            account_id: new.account_id,
            kind: new.kind,
            first_name: new.first_name,
            last_name: new.last_name,
            logo_url: new.logo_url,
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        let UserPatch {
            kind,
            first_name,
            last_name,
            logo_url,
        } = patch;

        if let Some(kind) = kind {
            self.kind = kind;
        }
        first_name.apply_to(&mut self.first_name);
        last_name.apply_to(&mut self.last_name);
        logo_url.apply_to(&mut self.logo_url);
    }
}

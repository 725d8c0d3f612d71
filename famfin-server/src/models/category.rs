//! Category: a labelled bucket for transactions under an account

use serde::{Deserialize, Serialize};

use super::fields::{lax, non_null, Update};
use super::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    Expense,
    Income,
    Transfer,
}

impl CategoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Transfer => "transfer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    pub logo_url: Option<String>,
    /// Ordered tag ids; `None` and an empty list are different values.
    pub tags: Option<Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCategory {
    #[serde(deserialize_with = "lax::int")]
    pub account_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default, deserialize_with = "lax::int_list")]
    pub tags: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryPatch {
    #[serde(default, deserialize_with = "non_null")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "non_null")]
    pub kind: Option<CategoryType>,
    #[serde(default)]
    pub logo_url: Update<String>,
    #[serde(default, deserialize_with = "lax::int_list_update")]
    pub tags: Update<Vec<i32>>,
}

impl Entity for Category {
    const KIND: &'static str = "Category";
    const COLLECTION: &'static str = "categories";

    type New = NewCategory;
    type Patch = CategoryPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn create(id: i64, new: NewCategory) -> Self {
        Self {
            id,
            account_id: new.account_id,
            name: new.name,
            kind: new.kind,
            logo_url: new.logo_url,
            tags: new.tags,
        }
    }

    fn apply(&mut self, patch: CategoryPatch) {
        let CategoryPatch {
            name,
            kind,
            logo_url,
            tags,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(kind) = kind {
            self.kind = kind;
        }
        logo_url.apply_to(&mut self.logo_url);
        tags.apply_to(&mut self.tags);
    }
}

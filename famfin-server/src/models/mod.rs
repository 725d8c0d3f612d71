//! Domain models with validation at construction
//!
//! Request bodies are turned into typed create payloads and changesets
//! here. Invalid input returns ValidationErrors, never a partial value.

pub mod validation;
pub mod fields;
pub mod email;
pub mod entity;
pub mod account;
pub mod user;
pub mod category;

pub use validation::{ValidationError, ValidationErrors};
pub use fields::{decode, Update};
pub use email::{Email, EmailError};
pub use entity::Entity;
pub use account::{Account, AccountPatch, AccountStatus, NewAccount};
pub use user::{NewUser, User, UserPatch, UserType};
pub use category::{Category, CategoryPatch, CategoryType, NewCategory};

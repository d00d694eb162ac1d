//! Client side of the session flow: a typed API port, its HTTP adapter and
//! the auth store a UI reads from.

mod api;
mod error;
mod store;

pub use api::{AuthApi, HttpAuthApi};
pub use error::ClientError;
pub use store::{AuthState, AuthStore};

use serde::Deserialize;

/// User summary returned by register, login and `me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stored credentials for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub password_hash: String,
}

/// All registered accounts, keyed by username.
pub type Users = BTreeMap<String, User>;

/// The signed-in user. At most one exists at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    /// Milliseconds since the Unix epoch.
    pub logged_at: i64,
}

use serde::{Deserialize, Serialize};

pub const DEFAULT_SUBJECT: &str = "admin-user";

/// Secrets the authorizer checks tokens against
#[derive(Clone, Debug)]
pub struct AuthSettings {
    pub admin_token: String,
    pub admin_username: String,
}

impl AuthSettings {
    pub fn new(admin_token: String, admin_username: String) -> Self {
        Self {
            admin_token,
            admin_username,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Owner,
    #[default]
    Manager,
}

impl AdminRole {
    /// `owner` stays owner; every other value is a manager.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(role) if role.eq_ignore_ascii_case("owner") => AdminRole::Owner,
            _ => AdminRole::Manager,
        }
    }
}

/// Claims carried by a signed admin token
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AdminClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "isMain")]
    pub is_main: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// The caller a write request was authorized for
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdminIdentity {
    pub sub: String,
    pub username: String,
    pub email: Option<String>,
    pub role: AdminRole,
    pub is_main: bool,
}

impl AdminIdentity {
    /// Identity granted to the static admin token
    pub fn legacy_owner(username: &str) -> Self {
        Self {
            sub: DEFAULT_SUBJECT.to_string(),
            username: username.to_string(),
            email: None,
            role: AdminRole::Owner,
            is_main: true,
        }
    }
}

/// Auth context passed through request extensions
#[derive(Clone, Debug, Default)]
pub struct AuthContext {
    pub identity: Option<AdminIdentity>,
    pub token_provided: bool,
    pub error: Option<String>,
}

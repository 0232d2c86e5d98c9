use serde::{Deserialize, Serialize};

/// Body of `POST /auth`. `action == "register"` selects registration,
/// anything else is a login.
#[derive(Debug, Default, Deserialize)]
pub struct AuthRequest {
    pub action: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl AuthRequest {
    pub fn is_register(&self) -> bool {
        self.action.as_deref() == Some("register")
    }
}

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Validated login input.
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

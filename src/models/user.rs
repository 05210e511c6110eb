// src/models/user.rs
use serde::{Deserialize, Serialize};

/// Текущий пользователь (`jwt/users/me/`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

use serde::{Deserialize, Serialize};

// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub username: String,
}

// Login response: the token plus the logged-in user
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

impl LoginResponse {
    pub fn new(token: String, username: String) -> Self {
        Self {
            token,
            user: UserInfo { username },
        }
    }
}

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::ToSchema;

use crate::entities::Role;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
});

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub username: String,
    /// Desired role; defaults to `faculty` when omitted.
    pub role: Option<Role>,
}

impl SignupRequest {
    /// `allowed_domain` restricts signups to one organizational email
    /// domain when set (stricter deployments).
    pub fn validate(&self, allowed_domain: Option<&str>) -> Result<(), String> {
        if !EMAIL_REGEX.is_match(&self.email) {
            return Err("Invalid email format".to_string());
        }
        if let Some(domain) = allowed_domain {
            let suffix = format!("@{domain}");
            if !self.email.ends_with(&suffix) {
                return Err(format!("Email must belong to the {domain} domain"));
            }
        }
        if self.password.len() < 8 {
            return Err("Password must be at least 8 characters".to_string());
        }
        if self.password.len() > 512 {
            return Err("Password too long".to_string());
        }
        if self.username.trim().is_empty() {
            return Err("Username cannot be empty".to_string());
        }
        if self.username.trim().len() > 64 {
            return Err("Username too long".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !EMAIL_REGEX.is_match(&self.email) {
            return Err("Invalid email format".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

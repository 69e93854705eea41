use serde::{Deserialize, Serialize};

/// A registered user; leases pick their tenant from this list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl User {
    /// Paths of the user endpoints
    pub const LIST_PATH: &'static str = "/users/api/users/";
    pub const REGISTER_PATH: &'static str = "/users/auth/users/";
    pub const TOKEN_PATH: &'static str = "/users/api/token/";
}

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Token issuance response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Registration request body
#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub password: String,
    pub re_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_optional_fields() {
        let user: User =
            serde_json::from_value(serde_json::json!({"id": 1, "username": "jan"})).unwrap();
        assert_eq!(user.email, "");
        assert_eq!(user.phone_number, None);
    }

    #[test]
    fn test_token_pair_without_refresh() {
        let pair: TokenPair = serde_json::from_str(r#"{"access":"abc"}"#).unwrap();
        assert_eq!(pair.access, "abc");
        assert!(pair.refresh.is_none());
    }
}

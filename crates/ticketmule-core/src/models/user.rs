use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity returned by the server on a successful login.
///
/// Only `id` and `username` are interpreted. Any other fields the server
/// sends are kept in `extra` so the object can be handed back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default, alias = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Name to show in the UI, falling back to the username
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                format!("{} {}", first, last)
            }
            (Some(first), _) if !first.is_empty() => first.to_string(),
            _ => self.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_keeps_unknown_fields() {
        let json = r#"{
            "id": 3,
            "username": "jsmith",
            "firstName": "Jane",
            "lastName": "Smith",
            "admin": true,
            "time_zone": "UTC"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.id, 3);
        assert_eq!(user.username, "jsmith");
        assert_eq!(user.extra.get("admin"), Some(&Value::Bool(true)));
        assert_eq!(user.extra.get("time_zone"), Some(&Value::String("UTC".into())));
    }

    #[test]
    fn test_display_name() {
        let mut user: User =
            serde_json::from_str(r#"{"id": 1, "username": "jsmith"}"#).unwrap();
        assert_eq!(user.display_name(), "jsmith");

        user.first_name = Some("Jane".to_string());
        assert_eq!(user.display_name(), "Jane");

        user.last_name = Some("Smith".to_string());
        assert_eq!(user.display_name(), "Jane Smith");
    }
}

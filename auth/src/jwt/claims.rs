use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Access token claim set.
///
/// Registered RFC 7519 claims plus custom fields via the `extra` map.
/// `sub` and `aud` are serialized as strings so any RFC 7519 verifier
/// can check them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Audience (application identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set audience.
    pub fn with_audience(mut self, aud: impl ToString) -> Self {
        self.aud = Some(aud.to_string());
        self
    }

    /// Set issued-at and expiration (Unix timestamps).
    pub fn with_validity(mut self, iat: i64, exp: i64) -> Self {
        self.iat = Some(iat);
        self.exp = Some(exp);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Get email from extra fields.
    pub fn email(&self) -> Option<&str> {
        self.extra.get("email").and_then(|v| v.as_str())
    }

    /// Seconds between `iat` and `exp`, when both are present.
    pub fn lifetime_seconds(&self) -> Option<i64> {
        Some(self.exp? - self.iat?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let claims = Claims::new().with_subject(42);
        assert_eq!(claims.sub, Some("42".to_string()));
        assert!(claims.exp.is_none());
        assert!(claims.lifetime_seconds().is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let claims = Claims::new()
            .with_subject(7)
            .with_audience(3)
            .with_validity(1234567800, 1234567890)
            .with_extra("email", "a@x.com");

        assert_eq!(claims.sub.as_deref(), Some("7"));
        assert_eq!(claims.aud.as_deref(), Some("3"));
        assert_eq!(claims.email(), Some("a@x.com"));
        assert_eq!(claims.lifetime_seconds(), Some(90));
    }

    #[test]
    fn test_serialized_shape() {
        let claims = Claims::new()
            .with_subject(1)
            .with_audience(1)
            .with_validity(100, 160)
            .with_extra("email", "a@x.com");

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "sub": "1",
                "aud": "1",
                "iat": 100,
                "exp": 160,
                "email": "a@x.com",
            })
        );
    }
}

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Issues signed access tokens with a fixed time-to-live.
///
/// The signing key is supplied per call: every audience signs with its own
/// secret and there is no issuer-wide key.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    ttl: Duration,
}

/// Result of a successful issuance.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Signed JWT
    pub access_token: String,
    /// Claims encoded in `access_token`
    pub claims: Claims,
}

impl TokenIssuer {
    /// Create an issuer whose tokens live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Lifetime stamped into every issued token.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject` scoped to `audience`.
    ///
    /// # Errors
    /// * `EmptyKey` - `signing_key` is empty
    /// * `EncodingFailed` - Token generation failed
    pub fn issue(
        &self,
        subject: impl ToString,
        audience: impl ToString,
        signing_key: &[u8],
    ) -> Result<IssuedToken, JwtError> {
        let template = Claims::new()
            .with_subject(subject)
            .with_audience(audience);

        self.issue_at(template, signing_key, Utc::now())
    }

    /// Issue a token from a claim template, stamping `iat`/`exp` from `now`.
    ///
    /// Any validity already present in `template` is overwritten, so
    /// `exp - iat` always equals the issuer's TTL.
    ///
    /// # Errors
    /// * `EmptyKey` - `signing_key` is empty
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_at(
        &self,
        template: Claims,
        signing_key: &[u8],
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        if signing_key.is_empty() {
            return Err(JwtError::EmptyKey);
        }

        let issued_at = now.timestamp();
        let claims = template.with_validity(issued_at, issued_at + self.ttl.num_seconds());
        let access_token = JwtHandler::new(signing_key).encode(&claims)?;

        Ok(IssuedToken {
            access_token,
            claims,
        })
    }
}

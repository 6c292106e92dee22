//! Authentication utilities library
//!
//! Provides the credential primitives used by the SSO service:
//! - Password hashing (Argon2id)
//! - JWT claims, encoding and validation
//! - Token issuance with a fixed time-to-live
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Issuing Tokens
//! ```
//! use auth::{Claims, JwtHandler, TokenIssuer};
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(Duration::hours(1));
//! let issued = issuer.issue(42, 7, b"application_secret").unwrap();
//!
//! let decoded: Claims = JwtHandler::new(b"application_secret")
//!     .decode_for_audience(&issued.access_token, "7")
//!     .unwrap();
//! assert_eq!(decoded.sub.as_deref(), Some("42"));
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use issuer::IssuedToken;
pub use issuer::TokenIssuer;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;

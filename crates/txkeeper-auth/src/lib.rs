//! Credential checks and signed access token issuance
//!
//! The login flow is a single step: `authenticate` the pair, then
//! `issue_token` for the user. Protected routes call `validate_token`.

pub mod credentials;
pub mod error;
pub mod issuer;

pub use credentials::{CredentialStore, SingleCredentialStore};
pub use error::{AuthError, AuthResult};
pub use issuer::{Claims, IssuedToken, TokenIssuer, MIN_SECRET_BYTES};

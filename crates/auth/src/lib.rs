//! `flipstock-auth` — authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: credentials
//! and password hashes, deterministic claim validation, and HS256 token
//! issue/verify. Session transport (the `Authorization` header) lives in
//! the API crate; user persistence lives in infra.

pub mod claims;
pub mod credentials;
pub mod token;
pub mod user;

pub use claims::{validate_claims, Claims, TokenValidationError};
pub use credentials::{Credentials, PasswordHash};
pub use token::{Hs256Jwt, JwtValidator, TokenError};
pub use user::User;

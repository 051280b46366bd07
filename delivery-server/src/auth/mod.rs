//! Authentication and authorization
//!
//! - [`jwt`] - bearer token issue/validation
//! - [`password`] - Argon2 hashing
//! - [`extractor`] - [`CurrentUser`] request extractor
//! - [`policy`] - role and ownership predicates
//! - [`rate_limit`] - per-IP limits for login and registration

pub mod extractor;
pub mod jwt;
pub mod password;
pub mod policy;
pub mod rate_limit;

pub use extractor::CurrentUser;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use rate_limit::RateLimiter;

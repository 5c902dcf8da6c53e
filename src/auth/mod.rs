//! Authentication
//!
//! Password hashing, JWT issuance/verification, and the bearer-token
//! middleware guarding protected routes.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod service;

pub use extractors::AuthUser;
pub use service::AuthService;

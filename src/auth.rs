//! Auth-domain value types: token responses, redacted secrets, PKCE pairs, and the normalized
//! user record.

pub mod pkce;
pub mod token;
pub mod user;

pub use pkce::*;
pub use token::*;
pub use user::*;

//! Authentication module
//!
//! Argon2id password hashing, HS256 bearer tokens and the request extractor
//! that turns a token back into a user ID.

mod clock;
mod error;
mod jwt;
mod middleware;
mod password;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AuthError, HashError, TokenError};
pub use jwt::{Claims, IssuedToken, TokenIssuer, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS, TOKEN_TYPE};
pub use middleware::AuthUser;
pub use password::PasswordService;

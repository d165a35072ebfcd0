//! Form-login security: password digests, signed session cookies and the
//! middleware that authorizes each request.

pub mod extractors;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod session;

pub use extractors::CurrentUser;
pub use middleware::SecurityMiddleware;
pub use password::PasswordHasher;
pub use policy::SecurityPolicy;
pub use session::{SessionClaims, SessionManager, SESSION_COOKIE};

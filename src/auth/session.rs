use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::user::has_role;

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "SESSION";

/// Claims encoded within a session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionClaims {
    /// Username of the logged-in account.
    pub sub: String,
    /// Comma-separated role tags at login time.
    pub roles: String,
    /// Issued-at (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

impl SessionClaims {
    pub fn has_role(&self, role: &str) -> bool {
        has_role(&self.roles, role)
    }
}

/// Issues and verifies HS256-signed session tokens and builds the cookies carrying them.
#[derive(Clone)]
pub struct SessionManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    /// Signs a token for `username` carrying its roles.
    pub fn issue(&self, username: &str, roles: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal("session expiry out of range".into()))?;

        let claims = SessionClaims {
            sub: username.to_string(),
            roles: roles.to_string(),
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign session: {}", e)))
    }

    /// Checks signature and expiry. Any failure is `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }

    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::seconds(self.ttl.num_seconds()))
            .finish()
    }

    /// Cookie instructing the browser to drop the session.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .finish();
        cookie.make_removal();
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_issue_and_verify() {
        let sessions = SessionManager::new("test_secret", 24);
        let token = sessions.issue("alice", "ROLE_USER").unwrap();
        let claims = sessions.verify(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert!(claims.has_role("ROLE_USER"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_session_rejected() {
        let sessions = SessionManager::new("test_secret", 24);
        let past = Utc::now() - Duration::hours(2);
        let claims = SessionClaims {
            sub: "alice".into(),
            roles: "ROLE_USER".into(),
            iat: (past - Duration::hours(1)).timestamp() as usize,
            exp: past.timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret".as_bytes()),
        )
        .unwrap();

        match sessions.verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("ExpiredSignature")),
            other => panic!("expected expired session, got {:?}", other),
        }
    }

    #[test]
    fn test_session_signed_with_other_secret_rejected() {
        let token = SessionManager::new("secret_one", 24)
            .issue("alice", "ROLE_USER")
            .unwrap();
        let result = SessionManager::new("secret_two", 24).verify(&token);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_cookies() {
        let sessions = SessionManager::new("test_secret", 1);
        let cookie = sessions.cookie("token".into());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(3600)));

        let removal = sessions.removal_cookie();
        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(CookieDuration::ZERO));
    }
}

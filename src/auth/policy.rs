//! Request authorization rules, evaluated in order: public-path allowlist,
//! session check, role check.

use crate::auth::session::SessionClaims;
use crate::error::AppError;
use crate::models::DEFAULT_ROLE;

/// A path pattern: an exact path, or `prefix/**` matching the prefix and everything below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    Prefix(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(prefix) => PathPattern::Prefix(prefix.to_string()),
            None => PathPattern::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(exact) => path == exact,
            PathPattern::Prefix(prefix) => match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone)]
struct RoleRule {
    pattern: PathPattern,
    role: String,
}

/// Declarative access rules for the whole application.
#[derive(Debug, Clone)]
pub struct SecurityPolicy {
    public: Vec<PathPattern>,
    roles: Vec<RoleRule>,
    api_prefix: PathPattern,
}

impl SecurityPolicy {
    /// A policy where every path needs a session.
    pub fn new() -> Self {
        Self {
            public: Vec::new(),
            roles: Vec::new(),
            api_prefix: PathPattern::parse("/api/**"),
        }
    }

    pub fn permit(mut self, pattern: &str) -> Self {
        self.public.push(PathPattern::parse(pattern));
        self
    }

    /// Paths matching `pattern` additionally need `role`. The first matching rule wins.
    pub fn require_role(mut self, pattern: &str, role: &str) -> Self {
        self.roles.push(RoleRule {
            pattern: PathPattern::parse(pattern),
            role: role.to_string(),
        });
        self
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public.iter().any(|p| p.matches(path))
    }

    pub fn required_role(&self, path: &str) -> Option<&str> {
        self.roles
            .iter()
            .find(|rule| rule.pattern.matches(path))
            .map(|rule| rule.role.as_str())
    }

    /// Decides whether a request for `path` with the given session may proceed.
    ///
    /// Without a session, API paths are refused with `Unauthorized` and pages
    /// with `LoginRequired`.
    pub fn evaluate(&self, path: &str, session: Option<&SessionClaims>) -> Result<(), AppError> {
        if self.is_public(path) {
            return Ok(());
        }

        let claims = match session {
            Some(claims) => claims,
            None if self.api_prefix.matches(path) => {
                return Err(AppError::Unauthorized("Authentication required".into()))
            }
            None => return Err(AppError::LoginRequired),
        };

        match self.required_role(path) {
            Some(role) if !claims.has_role(role) => {
                Err(AppError::Forbidden(format!("{} required", role)))
            }
            _ => Ok(()),
        }
    }
}

impl Default for SecurityPolicy {
    /// Static assets, the login/registration pages and the task API are
    /// open; `/api/users/**` needs `ROLE_USER`; everything else needs a session.
    fn default() -> Self {
        SecurityPolicy::new()
            .permit("/css/**")
            .permit("/js/**")
            .permit("/images/**")
            .permit("/")
            .permit("/login")
            .permit("/logout")
            .permit("/register")
            .permit("/health")
            .permit("/api/tasks/**")
            .require_role("/api/users/**", DEFAULT_ROLE)
    }
}

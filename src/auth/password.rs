use crate::error::AppError;
use bcrypt::{hash, verify};

/// Lowest bcrypt work factor the library accepts.
pub const MIN_COST: u32 = 4;
/// Highest bcrypt work factor the library accepts.
pub const MAX_COST: u32 = 31;

/// One-way password digests with a configurable bcrypt cost.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// A malformed digest counts as a mismatch.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        match verify(password, digest) {
            Ok(matched) => matched,
            Err(e) => {
                log::warn!("password digest could not be checked: {}", e);
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(MIN_COST)
    }
}

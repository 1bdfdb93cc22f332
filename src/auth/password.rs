use bcrypt::{hash, verify, DEFAULT_COST};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Hashing or verification could not run (bad salt source, malformed hash).
    #[error("Failed to process password: {0}")]
    Hashing(String),

    /// The plaintext does not match the stored hash.
    #[error("Password does not match")]
    Mismatch,
}

/// Salted, deliberately slow password hashing backed by bcrypt.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        hash(password, self.cost).map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    /// Checks `password` against a stored bcrypt hash.
    pub fn verify(&self, hashed_password: &str, password: &str) -> Result<(), PasswordError> {
        match verify(password, hashed_password) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::Hashing(e.to_string())),
        }
    }
}

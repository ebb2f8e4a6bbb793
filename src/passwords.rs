use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    #[error("Failed to parse password hash: {0}")]
    InvalidHash(String),
}

pub type Result<T> = std::result::Result<T, PasswordError>;

/// Argon2id password hashing with fixed cost parameters and length guards.
#[derive(Clone)]
pub struct Passwords<'a> {
    a2: Argon2<'a>,
    min_len: usize,
    max_len: usize,
}

impl<'a> Passwords<'a> {
    pub fn new(mem_kib: u32, iters: u32, lanes: u32) -> Self {
        let params = Params::new(mem_kib, iters, lanes, None).expect("argon2 params");
        let a2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        Self {
            a2,
            min_len: 8,
            max_len: 512,
        }
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        self.guard_length(password)?;
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .a2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        Ok(phc.to_string())
    }

    /// Returns `(password_ok, needs_rehash)`. `needs_rehash` is set when the
    /// stored hash predates the current algorithm or cost parameters.
    pub fn verify(&self, password: &str, pw_hash: &str) -> Result<(bool, bool)> {
        let parsed =
            PasswordHash::new(pw_hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
        let ok = self
            .a2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
        let needs_rehash = ok
            && match Params::try_from(&parsed) {
                Ok(stored) => {
                    !(parsed.algorithm == Algorithm::Argon2id.ident()
                        && parsed.version == Some(Version::V0x13.into())
                        && stored.m_cost() == self.a2.params().m_cost()
                        && stored.t_cost() == self.a2.params().t_cost()
                        && stored.p_cost() == self.a2.params().p_cost())
                }
                // Unparseable cost params on a hash that still verifies:
                // definitely from an older scheme.
                Err(_) => true,
            };
        Ok((ok, needs_rehash))
    }

    fn guard_length(&self, s: &str) -> Result<()> {
        let len = s.chars().count();
        if len < self.min_len || len > self.max_len {
            return Err(PasswordError::HashingFailed(
                "password length out of bounds".into(),
            ));
        }
        Ok(())
    }
}

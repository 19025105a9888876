// src/auth/password.rs

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::Result;

pub fn hash_password(password: &str) -> Result<String> {
    Ok(hash(password, DEFAULT_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    Ok(verify(password, hash)?)
}

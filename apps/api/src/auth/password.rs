// Operator password hashing (bcrypt)

use bcrypt::{hash, verify};

pub use bcrypt::DEFAULT_COST;

/// Hashes a password with the given bcrypt cost
///
/// # Example
/// ```
/// use aiworker_console::auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("night-shift", 4).expect("valid hash");
/// assert!(verify_password("night-shift", &hash).unwrap());
/// ```
pub fn hash_password(password: &str, cost: u32) -> Result<String, String> {
    hash(password, cost).map_err(|e| e.to_string())
}

/// Checks a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    verify(password, hash).map_err(|e| e.to_string())
}

use uuid::Uuid;

use super::value_objects::Email;

/// A console operator
///
/// Operators are seeded at startup; there is no self-registration.
#[derive(Debug, Clone)]
pub struct Operator {
    pub id: Uuid,
    pub email: Email,
    pub password_hash: String,
    pub full_name: String,
    pub is_active: bool,
}

impl Operator {
    /// Creates an active operator from an already hashed password
    pub fn new(email: Email, password_hash: String, full_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            full_name: full_name.into(),
            is_active: true,
        }
    }
}

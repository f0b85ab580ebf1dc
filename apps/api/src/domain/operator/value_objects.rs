use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator login address
///
/// # Invariants
/// - Exactly one '@' with a non-empty local part and domain
/// - Stored trimmed and lowercased so lookups are case-insensitive
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use aiworker_console::domain::operator::Email;
    ///
    /// let email = Email::new(" Operator@Example.com ").expect("valid email");
    /// assert_eq!(email.as_str(), "operator@example.com");
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, String> {
        let normalized = email.as_ref().trim().to_lowercase();
        match normalized.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Email(normalized))
            }
            _ => Err(format!("Invalid email: {}", email.as_ref())),
        }
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Operator session tokens
// HS256 tokens that expire after one 8-hour shift

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of an operator shift, after which the console asks for a new login
pub const TOKEN_LIFETIME_HOURS: i64 = 8;

/// Claims carried by an operator token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Operator id
    pub sub: Uuid,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

/// Issues a token for an operator
///
/// # Example
/// ```
/// use aiworker_console::auth::jwt::create_token;
/// use uuid::Uuid;
///
/// let token = create_token(Uuid::new_v4(), "console-secret").expect("valid token");
/// assert_eq!(token.split('.').count(), 3);
/// ```
pub fn create_token(operator_id: Uuid, secret: &str) -> Result<String, String> {
    let expiry = Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS);
    let claims = Claims {
        sub: operator_id,
        exp: expiry.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| e.to_string())
}

/// Verifies a token and returns its claims
///
/// # Returns
/// * `Err(String)` - If the signature is wrong or the shift has ended
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

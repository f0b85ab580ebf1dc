// Operator authentication
// Password hashing and session tokens for the console API

pub mod jwt;
pub mod password;

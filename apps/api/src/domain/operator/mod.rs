// Operator domain module
// People who sign in to the console and drive agent sessions

#![allow(clippy::module_inception)]

pub mod operator;
pub mod value_objects;

pub use operator::Operator;
pub use value_objects::Email;

//! Domain services: password hashing, token lifecycle, cart pricing.

pub mod password;
pub mod pricing;
pub mod tokens;

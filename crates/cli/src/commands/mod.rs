//! CLI command implementations.

pub mod check_users;
pub mod seed;

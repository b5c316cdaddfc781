//! Core types for StepAhead.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod profile;
pub mod username;

pub use email::{Email, EmailError};
pub use id::UserId;
pub use profile::Profile;
pub use username::{Username, UsernameError};

//! StepAhead Gateway library.
//!
//! Implements the unified credential gateway backing the StepAhead mobile
//! app: a human-chosen username and password are translated into calls
//! against an external identity provider and an external document store,
//! presenting one merged operation to callers instead of separate "login"
//! and "register" flows.
//!
//! # Modules
//!
//! - [`auth`] - The credential gateway itself
//! - [`config`] - Environment-based configuration
//! - [`firebase`] - Identity Toolkit REST client ([`provider::IdentityProvider`] impl)
//! - [`firestore`] - Firestore REST client ([`store::DocumentStore`] impl)
//! - [`navbar`] - Static bottom-navigation configuration
//! - [`provider`] / [`store`] - Collaborator contracts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod firebase;
pub mod firestore;
pub mod navbar;
pub mod provider;
pub mod store;

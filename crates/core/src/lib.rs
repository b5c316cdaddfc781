//! StepAhead Core - Shared types library.
//!
//! Domain types used across the StepAhead operational tooling: [`Username`]
//! (canonicalization and validation), [`Email`], [`UserId`], and the
//! [`Profile`] document.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

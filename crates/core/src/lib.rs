//! Mangaba Core - Shared types library.
//!
//! This crate provides common types used across all Mangaba components:
//! - `storefront` - Public-facing shop
//! - `admin` - Internal administration panel
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no session
//! handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, postal
//!   codes, roles, and the backend's pagination envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

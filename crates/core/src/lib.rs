//! Core business logic for Neraca.
//!
//! This crate contains pure business logic with ZERO web dependencies.
//! All domain types, validation rules, and state transitions live here.
//!
//! # Modules
//!
//! - `auth` - User roles and their capabilities
//! - `ledger` - Double-entry ledger capture and balance validation
//! - `posting` - Period-close posting stages and their ordering

pub mod auth;
pub mod ledger;
pub mod posting;

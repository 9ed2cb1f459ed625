//! Implementation of the `#[derive(Exportable)]` macro.
//!
//! This module generates the per-type attribute lookup table the gridcast
//! resolver binds column names against.

mod attrs;
mod derive;

pub use derive::exportable_derive_impl;

//! Common types used across the application.

pub mod key;

pub use key::*;

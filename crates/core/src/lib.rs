//! Core report logic for Ledgerview.
//!
//! This crate contains pure report logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `hierarchy` - Parent-linked rows as an expandable/collapsible tree
//! - `reports` - Report screen definitions, filters and execution

pub mod hierarchy;
pub mod reports;

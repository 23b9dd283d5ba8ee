//! Test fixtures and data generators
//!
//! This module contains builders for creating Org test data.

pub mod builders;

pub use builders::*;

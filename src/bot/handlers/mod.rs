//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete.

/// Autocomplete handlers for transaction types, categories, and payment methods
pub mod autocomplete;

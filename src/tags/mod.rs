//! Tag catalog domain
//!
//! Flat JSON stores per category, a soft-delete journal for the editable
//! categories, query helpers, and the remove/restore/reset lifecycle.

pub mod journal;
pub mod lifecycle;
pub mod query;
pub mod store;

//! Command implementations

pub mod collect;

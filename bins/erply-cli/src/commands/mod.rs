//! CLI command implementations

pub mod endpoints;
pub mod price_lists;
pub mod session;
pub mod suppliers;

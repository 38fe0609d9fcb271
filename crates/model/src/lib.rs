//! Plain data shared by the grid query crates: request descriptors, the class
//! schema and listing layout.

pub mod core;
pub mod error;
pub mod filter;
pub mod listing;
pub mod schema;

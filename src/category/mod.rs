//! The category hierarchy the bars report on.

pub mod node;
pub mod tree;

pub use node::{CashFlow, CategoryId, CategoryKind, CategoryNode};
pub use tree::CategoryTree;

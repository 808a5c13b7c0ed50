//! Backing stores and the record model.
//!
//! - [memory] - an in-memory document collection; specifications compile
//!   into closures over [Document]
//! - [sql] - renders specifications as parameterized SQL `WHERE`
//!   expressions

mod document;
pub mod memory;
pub mod sql;

pub use document::*;
pub use memory::{DocumentContext, DocumentPredicate, MemoryStore};
pub use sql::{SqlContext, SqlFragment};

//! # Larder - composable search filters for surplus-food listings
//!
//! Larder lets a search service describe dynamic, optional search criteria
//! as small immutable filter values and either evaluate them in memory or
//! translate them into a predicate for whatever backing store is attached.
//!
//! ## Building blocks
//!
//! - [`filter::ScalarFilter`] - single value comparison (`=, !=, >, >=, <, <=`)
//! - [`filter::SetMembershipFilter`] - membership of a reference set in a
//!   target collection (`CONTAINS_ALL`, `CONTAINS_ANY`, `CONTAINS_NONE`,
//!   `NOT_CONTAINS_ALL`)
//! - [`filter::FilterChain`] - in-memory conjunction of heterogeneous filters
//! - [`specification::Specification`] - opaque predicate for a backing store
//! - [`specification::combinator`] - null-safe AND / OR / NOT algebra over
//!   optional specifications, plus a left-to-right builder
//! - [`store`] - backing stores: an in-memory document store and a SQL
//!   renderer
//!
//! Distance filters over geographic coordinates live in the `larder_geo`
//! crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use larder::doc;
//! use larder::filter::{field, SetMembershipFilter};
//! use larder::specification::combinator;
//! use larder::store::{DocumentContext, MemoryStore};
//!
//! # fn main() -> Result<(), larder::errors::LarderError> {
//! let fresh = SetMembershipFilter::contains_all(["FRUITS_VEGETABLES", "DAIRY_COLD"])?;
//! assert!(fresh.check(&["FRUITS_VEGETABLES", "DAIRY_COLD", "BAKERY_PASTRY"])?);
//!
//! let store = MemoryStore::new();
//! store.insert(doc! { title: "Apples", quantity: 12, categories: ["FRUITS_VEGETABLES"] });
//! store.insert(doc! { title: "Yogurt", quantity: 3, categories: ["DAIRY_COLD"] });
//!
//! let query = combinator::builder::<DocumentContext>()
//!     .and(Some(field("quantity").gte(5)?))
//!     .and_if(false, Some(field("title").eq("Yogurt")?))
//!     .build();
//! assert_eq!(store.count(query.as_ref())?, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - value model and shared utilities
//! - [`errors`] - error types and result alias
//! - [`filter`] - filter values and the fluent field API
//! - [`larder_config`] - process-wide configuration
//! - [`specification`] - predicate abstraction and combinators
//! - [`store`] - backing stores

use crate::common::{atomic, Atomic};
use std::sync::LazyLock;

pub mod common;
pub mod errors;
pub mod filter;
pub mod larder_config;
pub mod specification;
pub mod store;

pub use common::Value;

pub(crate) static FIELD_SEPARATOR: LazyLock<Atomic<String>> =
    LazyLock::new(|| atomic(".".to_string()));

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    colog::init();
}

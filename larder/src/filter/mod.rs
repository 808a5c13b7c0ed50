//! Filters over single values, collections and the fluent field API.
//!
//! Every filter is an immutable value built by a factory that validates its
//! arguments. A filter either evaluates a candidate in memory (`check`) or
//! translates itself into a [Specification](crate::specification::Specification)
//! for a named field (`to_specification`).
//!
//! # Creating Filters
//!
//! ```rust
//! use larder::filter::{field, FilterChain, ScalarFilter, SetMembershipFilter};
//! use larder::specification::Specification;
//! use larder::store::DocumentContext;
//!
//! # fn main() -> Result<(), larder::errors::LarderError> {
//! // direct evaluation
//! let cold = SetMembershipFilter::contains_any(["DAIRY_COLD", "FROZEN"])?;
//! assert!(cold.check(&["FROZEN"])?);
//!
//! // in-memory conjunction
//! let chain = FilterChain::new()
//!     .add(ScalarFilter::greater_than(0)?)
//!     .add(ScalarFilter::less_than(10)?);
//! assert!(chain.check(&3)?);
//!
//! // backing-store translation
//! let spec: Specification<DocumentContext> = field("quantity").gt(0)?;
//! assert_eq!(spec.to_string(), "(quantity > 0)");
//! # Ok(())
//! # }
//! ```
//!
//! # Supported Operators
//!
//! - **Scalar**: `eq`, `ne`, `gt`, `gte`, `lt`, `lte`
//! - **Membership**: `contains_all`, `contains_any`, `contains_none`,
//!   `not_contains_all`

mod filter_chain;
mod filter_value;
mod fluent;
mod scalar_filter;
mod set_filter;

pub use filter_chain::*;
pub use filter_value::*;
pub use fluent::*;
pub use scalar_filter::*;
pub use set_filter::*;

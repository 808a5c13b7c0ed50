//! Opaque backing-store predicates and the algebra that combines them.
//!
//! A [Specification] is produced by translating a filter for a named field
//! (`to_specification`) or by combining other specifications. It never
//! looks at what its parts are; it only asks the attached [QueryContext] to
//! join their expressions.
//!
//! - [combinator] - null-safe free functions (`and`, `or`, `not`,
//!   `and_of_ors`, `or_of_ands`, `and_if`, `or_if`, ...)
//! - [SpecificationBuilder] - left-to-right fluent accumulator

mod builder;
pub mod combinator;
mod field_specs;
mod logical;
mod specification;

pub use builder::*;
pub(crate) use field_specs::*;
pub(crate) use logical::*;
pub use specification::*;

#[cfg(test)]
pub(crate) mod test_support {
    use itertools::Itertools;

    use super::{QueryContext, Specification};
    use crate::common::Value;
    use crate::errors::LarderResult;
    use crate::filter::{ScalarOperation, SetOperation};

    /// Renders expressions as plain text so tests can assert on structure.
    pub(crate) struct TraceContext;

    impl QueryContext for TraceContext {
        type Expr = String;

        fn conjunction(&self, predicates: Vec<String>) -> String {
            format!("({})", predicates.join(" AND "))
        }

        fn disjunction(&self, predicates: Vec<String>) -> String {
            format!("({})", predicates.join(" OR "))
        }

        fn negation(&self, predicate: String) -> String {
            format!("NOT {}", predicate)
        }

        fn constant(&self, value: bool) -> String {
            if value { "TRUE".into() } else { "FALSE".into() }
        }

        fn compare(&self, field: &str, operation: ScalarOperation, value: &Value) -> LarderResult<String> {
            Ok(format!("{} {} {}", field, operation, value))
        }

        fn membership(&self, field: &str, operation: SetOperation, values: &[Value]) -> LarderResult<String> {
            Ok(format!("{} {} [{}]", field, operation, values.iter().join(", ")))
        }
    }

    pub(crate) fn atom(name: &str) -> Specification<TraceContext> {
        let rendered = name.to_string();
        Specification::from_fn(name, move |_| Ok(rendered.clone()))
    }
}

use std::fmt::Display;

use itertools::Itertools;

use crate::common::Value;
use crate::errors::LarderResult;
use crate::filter::{ScalarOperation, SetOperation};

use super::{QueryContext, SpecificationProvider};

/// Translation of a scalar filter for a named field.
pub(crate) struct ComparisonSpecification {
    field_name: String,
    operation: ScalarOperation,
    value: Value,
}

impl ComparisonSpecification {
    pub(crate) fn new(field_name: &str, operation: ScalarOperation, value: Value) -> Self {
        ComparisonSpecification {
            field_name: field_name.to_string(),
            operation,
            value,
        }
    }
}

impl Display for ComparisonSpecification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.field_name, self.operation, self.value)
    }
}

impl<C: QueryContext> SpecificationProvider<C> for ComparisonSpecification {
    #[inline]
    fn to_predicate(&self, context: &C) -> LarderResult<C::Expr> {
        context.compare(&self.field_name, self.operation, &self.value)
    }
}

/// Translation of a membership filter for a named multi-valued field.
pub(crate) struct MembershipSpecification {
    field_name: String,
    operation: SetOperation,
    values: Vec<Value>,
}

impl MembershipSpecification {
    pub(crate) fn new(field_name: &str, operation: SetOperation, values: Vec<Value>) -> Self {
        MembershipSpecification {
            field_name: field_name.to_string(),
            operation,
            values,
        }
    }
}

impl Display for MembershipSpecification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({} {} [{}])",
            self.field_name,
            self.operation,
            self.values.iter().join(", ")
        )
    }
}

impl<C: QueryContext> SpecificationProvider<C> for MembershipSpecification {
    #[inline]
    fn to_predicate(&self, context: &C) -> LarderResult<C::Expr> {
        context.membership(&self.field_name, self.operation, &self.values)
    }
}

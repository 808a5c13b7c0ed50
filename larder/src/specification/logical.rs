use std::fmt::Display;

use itertools::Itertools;

use crate::errors::LarderResult;

use super::{QueryContext, Specification, SpecificationProvider};

/// A specification that holds when all of its parts hold.
///
/// The parts are translated in the order they were provided.
pub(crate) struct AndSpecification<C: QueryContext> {
    specifications: Vec<Specification<C>>,
}

impl<C: QueryContext> AndSpecification<C> {
    pub(crate) fn new(specifications: Vec<Specification<C>>) -> Self {
        AndSpecification { specifications }
    }
}

impl<C: QueryContext> Display for AndSpecification<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.specifications.iter().join(" && "))
    }
}

impl<C: QueryContext> SpecificationProvider<C> for AndSpecification<C> {
    fn to_predicate(&self, context: &C) -> LarderResult<C::Expr> {
        let predicates = self
            .specifications
            .iter()
            .map(|spec| spec.to_predicate(context))
            .collect::<LarderResult<Vec<_>>>()?;
        Ok(context.conjunction(predicates))
    }
}

/// A specification that holds when at least one of its parts holds.
pub(crate) struct OrSpecification<C: QueryContext> {
    specifications: Vec<Specification<C>>,
}

impl<C: QueryContext> OrSpecification<C> {
    pub(crate) fn new(specifications: Vec<Specification<C>>) -> Self {
        OrSpecification { specifications }
    }
}

impl<C: QueryContext> Display for OrSpecification<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.specifications.iter().join(" || "))
    }
}

impl<C: QueryContext> SpecificationProvider<C> for OrSpecification<C> {
    fn to_predicate(&self, context: &C) -> LarderResult<C::Expr> {
        let predicates = self
            .specifications
            .iter()
            .map(|spec| spec.to_predicate(context))
            .collect::<LarderResult<Vec<_>>>()?;
        Ok(context.disjunction(predicates))
    }
}

/// A specification that inverts another one.
pub(crate) struct NotSpecification<C: QueryContext> {
    specification: Specification<C>,
}

impl<C: QueryContext> NotSpecification<C> {
    pub(crate) fn new(specification: Specification<C>) -> Self {
        NotSpecification { specification }
    }
}

impl<C: QueryContext> Display for NotSpecification<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "!({})", self.specification)
    }
}

impl<C: QueryContext> SpecificationProvider<C> for NotSpecification<C> {
    fn to_predicate(&self, context: &C) -> LarderResult<C::Expr> {
        let predicate = self.specification.to_predicate(context)?;
        Ok(context.negation(predicate))
    }
}

/// A specification with a fixed truth value.
pub(crate) struct ConstantSpecification {
    value: bool,
}

impl ConstantSpecification {
    pub(crate) fn new(value: bool) -> Self {
        ConstantSpecification { value }
    }
}

impl Display for ConstantSpecification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.value {
            write!(f, "(true)")
        } else {
            write!(f, "(false)")
        }
    }
}

impl<C: QueryContext> SpecificationProvider<C> for ConstantSpecification {
    fn to_predicate(&self, context: &C) -> LarderResult<C::Expr> {
        Ok(context.constant(self.value))
    }
}

use std::fmt::{Debug, Display};
use std::sync::Arc;

use crate::common::Value;
use crate::errors::LarderResult;
use crate::filter::{ScalarOperation, SetOperation};

use super::{AndSpecification, NotSpecification, OrSpecification};

/// A backing store's predicate-building context.
///
/// A backing store plugs into Larder by implementing this trait. `Expr` is
/// whatever the store evaluates: a compiled closure, a SQL fragment, a
/// query-builder node. The combinator layer only ever calls
/// [conjunction](QueryContext::conjunction),
/// [disjunction](QueryContext::disjunction),
/// [negation](QueryContext::negation) and [constant](QueryContext::constant);
/// filter translation uses [compare](QueryContext::compare) and
/// [membership](QueryContext::membership).
///
/// Whatever a context emits must agree with the corresponding filter's
/// in-memory `check` for the same logical data.
pub trait QueryContext: Send + Sync + 'static {
    /// The boolean expression type of the backing store.
    type Expr;

    /// All of `predicates` hold. An empty list is `constant(true)`.
    fn conjunction(&self, predicates: Vec<Self::Expr>) -> Self::Expr;

    /// At least one of `predicates` holds. An empty list is `constant(false)`.
    fn disjunction(&self, predicates: Vec<Self::Expr>) -> Self::Expr;

    fn negation(&self, predicate: Self::Expr) -> Self::Expr;

    fn constant(&self, value: bool) -> Self::Expr;

    /// `field <operation> value`, with the candidate field on the left.
    fn compare(&self, field: &str, operation: ScalarOperation, value: &Value) -> LarderResult<Self::Expr>;

    /// Membership of the deduplicated, non-empty `values` in the
    /// multi-valued `field`.
    fn membership(&self, field: &str, operation: SetOperation, values: &[Value]) -> LarderResult<Self::Expr>;
}

/// Trait for implementing specifications.
///
/// A provider turns itself into a backing-store expression on demand. It is
/// immutable and may be shared across threads.
pub trait SpecificationProvider<C: QueryContext>: Send + Sync + Display {
    /// Builds the backing-store expression for this specification.
    fn to_predicate(&self, context: &C) -> LarderResult<C::Expr>;
}

/// An opaque, composable predicate over backing store `C`.
///
/// `Specification` is a cheap-to-clone handle; clones share the same
/// provider. Combining specifications never mutates them: every combination
/// produces a fresh value that references its inputs.
///
/// # Examples
///
/// ```rust
/// use larder::filter::ScalarFilter;
/// use larder::specification::Specification;
/// use larder::store::SqlContext;
///
/// # fn main() -> Result<(), larder::errors::LarderError> {
/// let min: Specification<SqlContext> = ScalarFilter::greater_or_equal(5)?.to_specification("quantity");
/// let max = ScalarFilter::less_than(50)?.to_specification("quantity");
///
/// let fragment = min.and(max).to_predicate(&SqlContext::new())?;
/// assert_eq!(fragment.sql(), "(quantity >= ? AND quantity < ?)");
/// # Ok(())
/// # }
/// ```
pub struct Specification<C: QueryContext> {
    inner: Arc<dyn SpecificationProvider<C>>,
}

impl<C: QueryContext> Specification<C> {
    /// Creates a new specification from a provider implementation.
    pub fn new<P: SpecificationProvider<C> + 'static>(provider: P) -> Self {
        Specification {
            inner: Arc::new(provider),
        }
    }

    /// Creates a specification from a closure over the context.
    ///
    /// `description` is only used for display.
    pub fn from_fn<F>(description: &str, f: F) -> Self
    where
        F: Fn(&C) -> LarderResult<C::Expr> + Send + Sync + 'static,
    {
        Specification::new(FnSpecification {
            description: description.to_string(),
            f: Box::new(f),
        })
    }

    /// Builds the backing-store expression for this specification.
    #[inline]
    pub fn to_predicate(&self, context: &C) -> LarderResult<C::Expr> {
        self.inner.to_predicate(context)
    }

    /// Combines this specification with another using logical AND.
    pub fn and(&self, other: Specification<C>) -> Self {
        Specification::new(AndSpecification::new(vec![self.clone(), other]))
    }

    /// Combines this specification with another using logical OR.
    pub fn or(&self, other: Specification<C>) -> Self {
        Specification::new(OrSpecification::new(vec![self.clone(), other]))
    }

    /// Negates this specification.
    pub fn not(&self) -> Self {
        Specification::new(NotSpecification::new(self.clone()))
    }

    /// Returns true if both handles share the same provider.
    #[inline]
    pub fn ptr_eq(&self, other: &Specification<C>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<C: QueryContext> Clone for Specification<C> {
    fn clone(&self) -> Self {
        Specification {
            inner: self.inner.clone(),
        }
    }
}

impl<C: QueryContext> Display for Specification<C> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl<C: QueryContext> Debug for Specification<C> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Specification{}", self.inner)
    }
}

type PredicateFn<C> = Box<dyn Fn(&C) -> LarderResult<<C as QueryContext>::Expr> + Send + Sync>;

struct FnSpecification<C: QueryContext> {
    description: String,
    f: PredicateFn<C>,
}

impl<C: QueryContext> Display for FnSpecification<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.description)
    }
}

impl<C: QueryContext> SpecificationProvider<C> for FnSpecification<C> {
    fn to_predicate(&self, context: &C) -> LarderResult<C::Expr> {
        (self.f)(context)
    }
}

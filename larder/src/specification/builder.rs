use super::{combinator, QueryContext, Specification};

/// A fluent accumulator of optional specifications.
///
/// Every call folds the accumulated specification with the new one in call
/// order; nothing is regrouped. `and(a).or(b).and(c)` builds
/// `((a OR b) AND c)`, never `(a OR (b AND c))`. Absent specifications are
/// skipped exactly as in [combinator::and] and [combinator::or].
///
/// # Examples
///
/// ```rust
/// use larder::filter::field;
/// use larder::specification::combinator;
/// use larder::store::SqlContext;
///
/// # fn main() -> Result<(), larder::errors::LarderError> {
/// let keyword: Option<&str> = Some("bread");
/// let spec = combinator::builder::<SqlContext>()
///     .and(Some(field("quantity").gt(0)?))
///     .and_if(keyword.is_some(), Some(field("title").eq(keyword.unwrap_or_default())?))
///     .or(Some(field("featured").eq(true)?))
///     .build()
///     .unwrap();
/// let fragment = spec.to_predicate(&SqlContext::new())?;
/// assert_eq!(fragment.sql(), "((quantity > ? AND title = ?) OR featured = ?)");
/// # Ok(())
/// # }
/// ```
pub struct SpecificationBuilder<C: QueryContext> {
    current: Option<Specification<C>>,
}

impl<C: QueryContext> Default for SpecificationBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: QueryContext> SpecificationBuilder<C> {
    pub fn new() -> Self {
        SpecificationBuilder { current: None }
    }

    /// Folds `current AND specification`.
    pub fn and(mut self, specification: Option<Specification<C>>) -> Self {
        self.current = combinator::and([self.current.take(), specification]);
        self
    }

    /// Folds `current OR specification`.
    pub fn or(mut self, specification: Option<Specification<C>>) -> Self {
        self.current = combinator::or([self.current.take(), specification]);
        self
    }

    /// Folds `current AND specification` only when `condition` holds.
    pub fn and_if(self, condition: bool, specification: Option<Specification<C>>) -> Self {
        if condition {
            self.and(specification)
        } else {
            self
        }
    }

    /// Folds `current OR specification` only when `condition` holds.
    pub fn or_if(self, condition: bool, specification: Option<Specification<C>>) -> Self {
        if condition {
            self.or(specification)
        } else {
            self
        }
    }

    /// True while nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Returns the accumulated specification, `None` if nothing was added.
    pub fn build(self) -> Option<Specification<C>> {
        self.current
    }

    /// Returns the accumulated specification, or `fallback` if nothing was
    /// added.
    pub fn build_or_default(self, fallback: Specification<C>) -> Specification<C> {
        self.current.unwrap_or(fallback)
    }
}

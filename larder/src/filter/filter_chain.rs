use std::sync::Arc;

use crate::errors::LarderResult;

use super::Checkable;

/// An in-memory conjunction of filters over one candidate type.
///
/// Filters are appended while the chain is being built and never removed.
/// Scalar, membership and distance filters can be mixed as long as each
/// accepts `C`. An empty chain accepts every candidate.
///
/// # Examples
///
/// ```rust
/// use larder::filter::{FilterChain, ScalarFilter};
///
/// # fn main() -> Result<(), larder::errors::LarderError> {
/// let chain = FilterChain::new()
///     .add(ScalarFilter::greater_than(0)?)
///     .add(ScalarFilter::less_or_equal(100)?);
/// assert!(chain.check(&42)?);
/// assert!(!chain.check(&0)?);
/// # Ok(())
/// # }
/// ```
pub struct FilterChain<C: ?Sized> {
    filters: Vec<Arc<dyn Checkable<C>>>,
}

impl<C: ?Sized> Default for FilterChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> Clone for FilterChain<C> {
    fn clone(&self) -> Self {
        FilterChain {
            filters: self.filters.clone(),
        }
    }
}

impl<C: ?Sized> FilterChain<C> {
    pub fn new() -> Self {
        FilterChain { filters: Vec::new() }
    }

    /// Appends a filter and returns the chain.
    pub fn add<F: Checkable<C> + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Appends every filter of `filters` in order.
    pub fn add_all<F, I>(mut self, filters: I) -> Self
    where
        F: Checkable<C> + 'static,
        I: IntoIterator<Item = F>,
    {
        for filter in filters {
            self.filters.push(Arc::new(filter));
        }
        self
    }

    /// Appends a filter in place.
    pub fn push<F: Checkable<C> + 'static>(&mut self, filter: F) {
        self.filters.push(Arc::new(filter));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns true iff every filter accepts `candidate`.
    ///
    /// Evaluation follows insertion order and stops at the first filter that
    /// rejects the candidate or fails.
    pub fn check(&self, candidate: &C) -> LarderResult<bool> {
        self.evaluate(candidate)
    }

    fn evaluate(&self, candidate: &C) -> LarderResult<bool> {
        for (index, filter) in self.filters.iter().enumerate() {
            if !filter.check(candidate)? {
                log::trace!("Candidate rejected by filter {} of {}", index + 1, self.filters.len());
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<C: ?Sized + 'static> Checkable<C> for FilterChain<C> {
    #[inline]
    fn check(&self, candidate: &C) -> LarderResult<bool> {
        self.evaluate(candidate)
    }
}

use std::fmt::Display;
use std::hash::{Hash, Hasher};

use crate::errors::{ErrorKind, LarderError, LarderResult};
use crate::specification::{ComparisonSpecification, QueryContext, Specification};

use super::{Checkable, FilterValue};

/// Comparison operator of a [ScalarFilter].
///
/// The candidate is always the left operand: `GreaterThan` holds when
/// `candidate > reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ScalarOperation {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl ScalarOperation {
    /// Applies the operator to `candidate` and `reference`.
    ///
    /// Relational operators are false for unordered pairs (a NaN operand).
    #[inline]
    pub fn apply<T: PartialOrd + ?Sized>(&self, candidate: &T, reference: &T) -> bool {
        match self {
            ScalarOperation::Equal => candidate == reference,
            ScalarOperation::NotEqual => candidate != reference,
            ScalarOperation::GreaterThan => candidate > reference,
            ScalarOperation::GreaterOrEqual => candidate >= reference,
            ScalarOperation::LessThan => candidate < reference,
            ScalarOperation::LessOrEqual => candidate <= reference,
        }
    }

    /// The SQL-style symbol of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            ScalarOperation::Equal => "=",
            ScalarOperation::NotEqual => "!=",
            ScalarOperation::GreaterThan => ">",
            ScalarOperation::GreaterOrEqual => ">=",
            ScalarOperation::LessThan => "<",
            ScalarOperation::LessOrEqual => "<=",
        }
    }
}

impl Display for ScalarOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarOperation::Equal => write!(f, "=="),
            other => write!(f, "{}", other.symbol()),
        }
    }
}

/// A single-value comparison against a fixed reference.
///
/// A `ScalarFilter` is immutable once built and can be shared freely. Two
/// filters are equal when they have the same operator and reference value.
///
/// # Examples
///
/// ```rust
/// use larder::filter::ScalarFilter;
///
/// # fn main() -> Result<(), larder::errors::LarderError> {
/// let at_least_five = ScalarFilter::greater_or_equal(5)?;
/// assert!(at_least_five.check(&5)?);
/// assert!(!at_least_five.check(&4)?);
///
/// // a missing reference is rejected up front
/// assert!(ScalarFilter::equal(None::<i32>).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScalarFilter<T: FilterValue> {
    value: T,
    operation: ScalarOperation,
}

impl<T: FilterValue> ScalarFilter<T> {
    /// Creates a filter with an explicit operator.
    ///
    /// # Errors
    ///
    /// Returns `NullArgument` if `value` is null.
    pub fn new(value: T, operation: ScalarOperation) -> LarderResult<Self> {
        if value.is_null() {
            log::error!("Reference value of a {} filter cannot be null", operation);
            return Err(LarderError::new(
                "Reference value of a scalar filter cannot be null",
                ErrorKind::NullArgument,
            ));
        }
        Ok(ScalarFilter { value, operation })
    }

    pub fn equal(value: T) -> LarderResult<Self> {
        Self::new(value, ScalarOperation::Equal)
    }

    pub fn not_equal(value: T) -> LarderResult<Self> {
        Self::new(value, ScalarOperation::NotEqual)
    }

    pub fn greater_than(value: T) -> LarderResult<Self> {
        Self::new(value, ScalarOperation::GreaterThan)
    }

    pub fn greater_or_equal(value: T) -> LarderResult<Self> {
        Self::new(value, ScalarOperation::GreaterOrEqual)
    }

    pub fn less_than(value: T) -> LarderResult<Self> {
        Self::new(value, ScalarOperation::LessThan)
    }

    pub fn less_or_equal(value: T) -> LarderResult<Self> {
        Self::new(value, ScalarOperation::LessOrEqual)
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[inline]
    pub fn operation(&self) -> ScalarOperation {
        self.operation
    }

    /// Evaluates `candidate <operation> reference`.
    ///
    /// # Errors
    ///
    /// Returns `NullArgument` if `candidate` is null.
    pub fn check(&self, candidate: &T) -> LarderResult<bool> {
        self.evaluate(candidate)
    }

    /// Translates the filter into a predicate on `field_name` of backing
    /// store `C`.
    pub fn to_specification<C: QueryContext>(&self, field_name: &str) -> Specification<C> {
        Specification::new(ComparisonSpecification::new(
            field_name,
            self.operation,
            self.value.to_value(),
        ))
    }

    fn evaluate(&self, candidate: &T) -> LarderResult<bool> {
        if candidate.is_null() {
            log::error!("Cannot check a null candidate against {}", self);
            return Err(LarderError::new(
                "Candidate of a scalar filter cannot be null",
                ErrorKind::NullArgument,
            ));
        }
        Ok(self.operation.apply(candidate, &self.value))
    }
}

// compared through `Value`, which orders floats totally (NaN equals NaN,
// -0.0 equals 0.0), so float references still hash
impl<T: FilterValue> PartialEq for ScalarFilter<T> {
    fn eq(&self, other: &Self) -> bool {
        self.operation == other.operation && self.value.to_value() == other.value.to_value()
    }
}

impl<T: FilterValue> Eq for ScalarFilter<T> {}

impl<T: FilterValue> Hash for ScalarFilter<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.operation.hash(state);
        self.value.to_value().hash(state);
    }
}

impl<T: FilterValue> Display for ScalarFilter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {:?})", self.operation, self.value)
    }
}

impl<T: FilterValue> Checkable<T> for ScalarFilter<T> {
    #[inline]
    fn check(&self, candidate: &T) -> LarderResult<bool> {
        self.evaluate(candidate)
    }
}

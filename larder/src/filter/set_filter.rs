use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::{Hash, Hasher};

use indexmap::IndexSet;
use itertools::Itertools;

use crate::errors::{ErrorKind, LarderError, LarderResult};
use crate::specification::{MembershipSpecification, QueryContext, Specification};

use super::{Checkable, FilterValue};

/// Membership relation of a [SetMembershipFilter] between its reference set
/// `R` and the set `S` of a target collection's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SetOperation {
    /// `R ⊆ S`
    ContainsAll,
    /// `R ∩ S ≠ ∅`
    ContainsAny,
    /// `R ∩ S = ∅`
    ContainsNone,
    /// `R ⊄ S`
    NotContainsAll,
}

impl SetOperation {
    /// Decides the relation from how many reference values the target
    /// contains out of `reference_size`.
    #[inline]
    pub fn holds(&self, matched: usize, reference_size: usize) -> bool {
        match self {
            SetOperation::ContainsAll => matched == reference_size,
            SetOperation::ContainsAny => matched > 0,
            SetOperation::ContainsNone => matched == 0,
            SetOperation::NotContainsAll => matched < reference_size,
        }
    }
}

impl Display for SetOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetOperation::ContainsAll => write!(f, "CONTAINS_ALL"),
            SetOperation::ContainsAny => write!(f, "CONTAINS_ANY"),
            SetOperation::ContainsNone => write!(f, "CONTAINS_NONE"),
            SetOperation::NotContainsAll => write!(f, "NOT_CONTAINS_ALL"),
        }
    }
}

/// Membership test of a fixed, deduplicated reference set against a target
/// collection.
///
/// The reference set is never empty and never holds a null element.
/// Duplicates collapse at construction, so `contains_all(["A", "A", "B"])`
/// and `contains_all(["B", "A"])` are the same filter: they are equal, hash
/// alike and display alike.
///
/// # Examples
///
/// ```rust
/// use larder::filter::SetMembershipFilter;
///
/// # fn main() -> Result<(), larder::errors::LarderError> {
/// let fresh = SetMembershipFilter::contains_all(["FRUITS_VEGETABLES", "DAIRY_COLD"])?;
/// assert!(fresh.check(&["FRUITS_VEGETABLES", "DAIRY_COLD", "BAKERY_PASTRY"])?);
/// assert!(!fresh.check(&["FRUITS_VEGETABLES", "BAKERY_PASTRY"])?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetMembershipFilter<T: FilterValue + Eq + Hash> {
    values: IndexSet<T>,
    operation: SetOperation,
}

impl<T: FilterValue + Eq + Hash> SetMembershipFilter<T> {
    /// Creates a filter with an explicit operation.
    ///
    /// # Errors
    ///
    /// Returns `NullArgument` if any element is null and `EmptyValue` if
    /// `values` yields nothing.
    pub fn new<I: IntoIterator<Item = T>>(values: I, operation: SetOperation) -> LarderResult<Self> {
        let mut set = IndexSet::new();
        for value in values {
            if value.is_null() {
                log::error!("Reference set of a {} filter contains a null value", operation);
                return Err(LarderError::new(
                    "Reference set of a membership filter cannot contain null values",
                    ErrorKind::NullArgument,
                ));
            }
            set.insert(value);
        }

        if set.is_empty() {
            log::error!("Reference set of a {} filter is empty", operation);
            return Err(LarderError::new(
                "Reference set of a membership filter cannot be empty",
                ErrorKind::EmptyValue,
            ));
        }

        Ok(SetMembershipFilter {
            values: set,
            operation,
        })
    }

    pub fn contains_all<I: IntoIterator<Item = T>>(values: I) -> LarderResult<Self> {
        Self::new(values, SetOperation::ContainsAll)
    }

    pub fn contains_any<I: IntoIterator<Item = T>>(values: I) -> LarderResult<Self> {
        Self::new(values, SetOperation::ContainsAny)
    }

    pub fn contains_none<I: IntoIterator<Item = T>>(values: I) -> LarderResult<Self> {
        Self::new(values, SetOperation::ContainsNone)
    }

    pub fn not_contains_all<I: IntoIterator<Item = T>>(values: I) -> LarderResult<Self> {
        Self::new(values, SetOperation::NotContainsAll)
    }

    /// Number of distinct reference values.
    #[inline]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// The distinct reference values in first-seen order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    #[inline]
    pub fn operation(&self) -> SetOperation {
        self.operation
    }

    /// Evaluates the relation against the elements of `target`.
    ///
    /// Duplicates in `target` collapse; an empty target contains nothing, so
    /// `CONTAINS_NONE` and `NOT_CONTAINS_ALL` hold for it.
    pub fn check(&self, target: &[T]) -> LarderResult<bool> {
        self.evaluate(target)
    }

    /// Translates the filter into a membership predicate on the multi-valued
    /// field `field_name` of backing store `C`.
    pub fn to_specification<C: QueryContext>(&self, field_name: &str) -> Specification<C> {
        let values = self.values.iter().map(FilterValue::to_value).collect();
        Specification::new(MembershipSpecification::new(field_name, self.operation, values))
    }

    fn evaluate(&self, target: &[T]) -> LarderResult<bool> {
        let elements: HashSet<&T> = target.iter().collect();
        let matched = self.values.iter().filter(|v| elements.contains(v)).count();
        Ok(self.operation.holds(matched, self.values.len()))
    }
}

impl<T: FilterValue + Eq + Hash> Hash for SetMembershipFilter<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.operation.hash(state);
        // order independent, consistent with set equality
        let combined = self.values.iter().fold(0u64, |acc, value| {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        combined.hash(state);
        self.values.len().hash(state);
    }
}

impl<T: FilterValue + Eq + Hash> Display for SetMembershipFilter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self.values.iter().map(|v| format!("{:?}", v)).sorted().join(", ");
        write!(f, "({} [{}])", self.operation, values)
    }
}

impl<T: FilterValue + Eq + Hash> Checkable<[T]> for SetMembershipFilter<T> {
    #[inline]
    fn check(&self, target: &[T]) -> LarderResult<bool> {
        self.evaluate(target)
    }
}

impl<T: FilterValue + Eq + Hash> Checkable<Vec<T>> for SetMembershipFilter<T> {
    #[inline]
    fn check(&self, target: &Vec<T>) -> LarderResult<bool> {
        self.evaluate(target)
    }
}

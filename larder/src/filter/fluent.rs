use std::hash::Hash;

use crate::errors::LarderResult;
use crate::specification::{QueryContext, Specification};

use super::{FilterValue, ScalarFilter, ScalarOperation, SetMembershipFilter, SetOperation};

/// Creates a fluent specification builder for the specified field name.
///
/// Each method builds the matching filter and translates it for the named
/// field in one step, so construction errors (`NullArgument`, `EmptyValue`)
/// surface exactly as they would from the filter factories.
///
/// # Examples
///
/// ```rust
/// use larder::filter::field;
/// use larder::specification::Specification;
/// use larder::store::DocumentContext;
///
/// # fn main() -> Result<(), larder::errors::LarderError> {
/// let spec: Specification<DocumentContext> = field("categories").contains_any(["BAKERY_PASTRY"])?;
/// assert_eq!(spec.to_string(), "(categories CONTAINS_ANY [\"BAKERY_PASTRY\"])");
/// # Ok(())
/// # }
/// ```
pub fn field(field_name: &str) -> FluentField {
    FluentField {
        field_name: field_name.to_string(),
    }
}

/// A fluent builder for specifications on a single field.
pub struct FluentField {
    field_name: String,
}

impl FluentField {
    #[inline]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    fn compare<C: QueryContext, T: FilterValue>(
        self,
        value: T,
        operation: ScalarOperation,
    ) -> LarderResult<Specification<C>> {
        Ok(ScalarFilter::new(value, operation)?.to_specification(&self.field_name))
    }

    fn membership<C, T, I>(self, values: I, operation: SetOperation) -> LarderResult<Specification<C>>
    where
        C: QueryContext,
        T: FilterValue + Eq + Hash,
        I: IntoIterator<Item = T>,
    {
        Ok(SetMembershipFilter::new(values, operation)?.to_specification(&self.field_name))
    }

    /// Field equals `value`.
    #[inline]
    pub fn eq<C: QueryContext, T: FilterValue>(self, value: T) -> LarderResult<Specification<C>> {
        self.compare(value, ScalarOperation::Equal)
    }

    /// Field differs from `value`.
    #[inline]
    pub fn ne<C: QueryContext, T: FilterValue>(self, value: T) -> LarderResult<Specification<C>> {
        self.compare(value, ScalarOperation::NotEqual)
    }

    /// Field is greater than `value`.
    #[inline]
    pub fn gt<C: QueryContext, T: FilterValue>(self, value: T) -> LarderResult<Specification<C>> {
        self.compare(value, ScalarOperation::GreaterThan)
    }

    /// Field is greater than or equal to `value`.
    #[inline]
    pub fn gte<C: QueryContext, T: FilterValue>(self, value: T) -> LarderResult<Specification<C>> {
        self.compare(value, ScalarOperation::GreaterOrEqual)
    }

    /// Field is less than `value`.
    #[inline]
    pub fn lt<C: QueryContext, T: FilterValue>(self, value: T) -> LarderResult<Specification<C>> {
        self.compare(value, ScalarOperation::LessThan)
    }

    /// Field is less than or equal to `value`.
    #[inline]
    pub fn lte<C: QueryContext, T: FilterValue>(self, value: T) -> LarderResult<Specification<C>> {
        self.compare(value, ScalarOperation::LessOrEqual)
    }

    /// The multi-valued field holds every one of `values`.
    pub fn contains_all<C, T, I>(self, values: I) -> LarderResult<Specification<C>>
    where
        C: QueryContext,
        T: FilterValue + Eq + Hash,
        I: IntoIterator<Item = T>,
    {
        self.membership(values, SetOperation::ContainsAll)
    }

    /// The multi-valued field holds at least one of `values`.
    pub fn contains_any<C, T, I>(self, values: I) -> LarderResult<Specification<C>>
    where
        C: QueryContext,
        T: FilterValue + Eq + Hash,
        I: IntoIterator<Item = T>,
    {
        self.membership(values, SetOperation::ContainsAny)
    }

    /// The multi-valued field holds none of `values`.
    pub fn contains_none<C, T, I>(self, values: I) -> LarderResult<Specification<C>>
    where
        C: QueryContext,
        T: FilterValue + Eq + Hash,
        I: IntoIterator<Item = T>,
    {
        self.membership(values, SetOperation::ContainsNone)
    }

    /// The multi-valued field misses at least one of `values`.
    pub fn not_contains_all<C, T, I>(self, values: I) -> LarderResult<Specification<C>>
    where
        C: QueryContext,
        T: FilterValue + Eq + Hash,
        I: IntoIterator<Item = T>,
    {
        self.membership(values, SetOperation::NotContainsAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::specification::test_support::TraceContext;

    fn render(spec: LarderResult<Specification<TraceContext>>) -> String {
        spec.unwrap().to_predicate(&TraceContext).unwrap()
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(render(field("quantity").eq(5)), "quantity == 5");
        assert_eq!(render(field("quantity").ne(5)), "quantity != 5");
        assert_eq!(render(field("quantity").gt(5)), "quantity > 5");
        assert_eq!(render(field("quantity").gte(5)), "quantity >= 5");
        assert_eq!(render(field("title").lt("m")), "title < \"m\"");
        assert_eq!(render(field("price").lte(2.5)), "price <= 2.5");
    }

    #[test]
    fn test_memberships() {
        assert_eq!(
            render(field("tags").contains_all(["a", "b", "a"])),
            "tags CONTAINS_ALL [\"a\", \"b\"]"
        );
        assert_eq!(render(field("tags").contains_any([1])), "tags CONTAINS_ANY [1]");
        assert_eq!(render(field("tags").contains_none(["x"])), "tags CONTAINS_NONE [\"x\"]");
        assert_eq!(
            render(field("tags").not_contains_all(["x", "y"])),
            "tags NOT_CONTAINS_ALL [\"x\", \"y\"]"
        );
    }

    #[test]
    fn test_construction_errors_surface() {
        let err = field("quantity").eq::<TraceContext, _>(None::<i32>).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NullArgument);
        let err = field("tags")
            .contains_any::<TraceContext, &str, _>([])
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::EmptyValue);
    }

    #[test]
    fn test_display() {
        let spec: Specification<TraceContext> = field("quantity").gte(5).unwrap();
        assert_eq!(spec.to_string(), "(quantity >= 5)");
        assert_eq!(field("x").field_name(), "x");
    }
}

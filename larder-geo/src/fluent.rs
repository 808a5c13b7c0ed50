//! Fluent API for distance specifications.
//!
//! ```rust
//! use larder::specification::Specification;
//! use larder::store::DocumentContext;
//! use larder_geo::{geo_field, GeoCoordinate};
//!
//! # fn main() -> Result<(), larder_geo::GeoError> {
//! let montreal = GeoCoordinate::new(45.5017, -73.5673);
//! let nearby: Specification<DocumentContext> = geo_field("location").within(montreal, 5.0)?;
//! assert_eq!(nearby.to_string(), "(location WITHIN 5 km of (45.5017, -73.5673))");
//! # Ok(())
//! # }
//! ```

use larder::specification::Specification;

use crate::{GeoCoordinate, GeoDistanceFilter, GeoQueryContext, GeoResult};

/// Creates a distance specification builder for the given coordinate field.
pub fn geo_field(field: impl Into<String>) -> GeoFluentField {
    GeoFluentField { field: field.into() }
}

/// A fluent builder for distance specifications on one coordinate field.
///
/// Every method validates like the matching [GeoDistanceFilter] factory.
#[derive(Debug, Clone)]
pub struct GeoFluentField {
    field: String,
}

impl GeoFluentField {
    fn translate<C: GeoQueryContext>(&self, filter: GeoDistanceFilter) -> Specification<C> {
        filter.to_specification(&self.field)
    }

    pub fn within<C: GeoQueryContext>(&self, reference: GeoCoordinate, km: f64) -> GeoResult<Specification<C>> {
        Ok(self.translate(GeoDistanceFilter::within(reference, km)?))
    }

    pub fn outside<C: GeoQueryContext>(&self, reference: GeoCoordinate, km: f64) -> GeoResult<Specification<C>> {
        Ok(self.translate(GeoDistanceFilter::outside(reference, km)?))
    }

    pub fn exactly<C: GeoQueryContext>(&self, reference: GeoCoordinate, km: f64) -> GeoResult<Specification<C>> {
        Ok(self.translate(GeoDistanceFilter::exactly(reference, km)?))
    }

    pub fn exactly_with_tolerance<C: GeoQueryContext>(
        &self,
        reference: GeoCoordinate,
        km: f64,
        tolerance: f64,
    ) -> GeoResult<Specification<C>> {
        Ok(self.translate(GeoDistanceFilter::exactly_with_tolerance(reference, km, tolerance)?))
    }

    pub fn greater_than<C: GeoQueryContext>(&self, reference: GeoCoordinate, km: f64) -> GeoResult<Specification<C>> {
        Ok(self.translate(GeoDistanceFilter::greater_than(reference, km)?))
    }

    pub fn greater_or_equal<C: GeoQueryContext>(
        &self,
        reference: GeoCoordinate,
        km: f64,
    ) -> GeoResult<Specification<C>> {
        Ok(self.translate(GeoDistanceFilter::greater_or_equal(reference, km)?))
    }

    pub fn less_than<C: GeoQueryContext>(&self, reference: GeoCoordinate, km: f64) -> GeoResult<Specification<C>> {
        Ok(self.translate(GeoDistanceFilter::less_than(reference, km)?))
    }

    pub fn less_or_equal<C: GeoQueryContext>(&self, reference: GeoCoordinate, km: f64) -> GeoResult<Specification<C>> {
        Ok(self.translate(GeoDistanceFilter::less_or_equal(reference, km)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoError;
    use larder::store::{DocumentContext, SqlContext};

    #[test]
    fn test_fluent_display() {
        let origin = GeoCoordinate::new(0.0, 0.0);
        let spec: Specification<DocumentContext> = geo_field("location").less_than(origin.clone(), 2.0).unwrap();
        assert_eq!(spec.to_string(), "(location LESS_THAN 2 km of (0, 0))");
        let spec: Specification<DocumentContext> =
            geo_field("location").exactly_with_tolerance(origin, 2.0, 0.5).unwrap();
        assert_eq!(spec.to_string(), "(location EXACTLY 2 km ± 0.5 of (0, 0))");
    }

    #[test]
    fn test_fluent_validation() {
        let origin = GeoCoordinate::new(0.0, 0.0);
        let err = geo_field("location").within::<SqlContext>(origin.clone(), -3.0).unwrap_err();
        assert!(matches!(err, GeoError::NegativeDistance(_)));
        let err = geo_field("location")
            .exactly_with_tolerance::<SqlContext>(origin, 1.0, -1.0)
            .unwrap_err();
        assert!(matches!(err, GeoError::NegativeTolerance(_)));
    }

    #[test]
    fn test_fluent_sql() {
        let spec: Specification<SqlContext> = geo_field("pickup")
            .greater_or_equal(GeoCoordinate::new(0.0, 0.0), 1.0)
            .unwrap();
        let fragment = spec.to_predicate(&SqlContext::new()).unwrap();
        assert!(fragment.sql().ends_with(") >= ?"));
        assert_eq!(fragment.params().len(), 4);
    }
}

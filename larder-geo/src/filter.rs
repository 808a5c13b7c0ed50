use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use larder::common::Value;
use larder::errors::LarderResult;
use larder::filter::Checkable;
use larder::specification::Specification;
use serde::{Deserialize, Serialize};

use crate::coordinate::bits;
use crate::specification::{GeoDistanceSpecification, GeoQueryContext};
use crate::{GeoCoordinate, GeoError, GeoResult};

/// Tolerance used by [GeoDistanceFilter::exactly], in kilometers.
pub const DEFAULT_TOLERANCE_KM: f64 = 0.1;

/// Relation between the measured distance `d` and a filter's threshold.
///
/// `Within` and `LessOrEqual` include the threshold, `Outside` excludes it:
/// a target exactly at the threshold is within and not outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeoOperation {
    /// `d <= km`
    Within,
    /// `d > km`
    Outside,
    /// `|d - km| <= tolerance`
    Exactly,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl GeoOperation {
    /// Decides the relation for distance `d`.
    ///
    /// `tolerance` only matters for [GeoOperation::Exactly].
    #[inline]
    pub fn holds(&self, d: f64, km: f64, tolerance: f64) -> bool {
        match self {
            GeoOperation::Within | GeoOperation::LessOrEqual => d <= km,
            GeoOperation::Outside | GeoOperation::GreaterThan => d > km,
            GeoOperation::Exactly => (d - km).abs() <= tolerance,
            GeoOperation::GreaterOrEqual => d >= km,
            GeoOperation::LessThan => d < km,
        }
    }
}

impl Display for GeoOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeoOperation::Within => "WITHIN",
            GeoOperation::Outside => "OUTSIDE",
            GeoOperation::Exactly => "EXACTLY",
            GeoOperation::GreaterThan => "GREATER_THAN",
            GeoOperation::GreaterOrEqual => "GREATER_OR_EQUAL",
            GeoOperation::LessThan => "LESS_THAN",
            GeoOperation::LessOrEqual => "LESS_OR_EQUAL",
        };
        write!(f, "{}", name)
    }
}

/// Distance comparison between a fixed reference coordinate and a target.
///
/// Distances are great-circle distances in kilometers. The threshold and,
/// for `EXACTLY`, the tolerance are never negative.
///
/// # Examples
///
/// ```rust
/// use larder_geo::{GeoCoordinate, GeoDistanceFilter};
///
/// # fn main() -> Result<(), larder_geo::GeoError> {
/// let montreal = GeoCoordinate::new(45.5017, -73.5673);
/// let toronto = GeoCoordinate::new(43.6532, -79.3832);
///
/// assert!(GeoDistanceFilter::within(montreal.clone(), 600.0)?.check(&toronto)?);
/// assert!(!GeoDistanceFilter::within(montreal, 500.0)?.check(&toronto)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GeoDistanceFilter {
    reference: GeoCoordinate,
    distance_km: f64,
    operation: GeoOperation,
    tolerance_km: Option<f64>,
}

impl GeoDistanceFilter {
    fn build(
        reference: GeoCoordinate,
        distance_km: f64,
        operation: GeoOperation,
        tolerance_km: Option<f64>,
    ) -> GeoResult<Self> {
        reference.ensure_complete("reference")?;
        if distance_km.is_nan() || distance_km < 0.0 {
            log::error!("Invalid {} distance {} km", operation, distance_km);
            return Err(GeoError::NegativeDistance(distance_km));
        }
        if let Some(tolerance) = tolerance_km {
            if tolerance.is_nan() || tolerance < 0.0 {
                log::error!("Invalid tolerance {} km", tolerance);
                return Err(GeoError::NegativeTolerance(tolerance));
            }
        }
        Ok(GeoDistanceFilter {
            reference,
            distance_km,
            operation,
            tolerance_km,
        })
    }

    /// Targets no farther than `km` (inclusive).
    pub fn within(reference: GeoCoordinate, km: f64) -> GeoResult<Self> {
        Self::build(reference, km, GeoOperation::Within, None)
    }

    /// Targets farther than `km` (exclusive).
    pub fn outside(reference: GeoCoordinate, km: f64) -> GeoResult<Self> {
        Self::build(reference, km, GeoOperation::Outside, None)
    }

    /// Targets at `km`, give or take [DEFAULT_TOLERANCE_KM].
    pub fn exactly(reference: GeoCoordinate, km: f64) -> GeoResult<Self> {
        Self::exactly_with_tolerance(reference, km, DEFAULT_TOLERANCE_KM)
    }

    /// Targets at `km`, give or take `tolerance`.
    pub fn exactly_with_tolerance(reference: GeoCoordinate, km: f64, tolerance: f64) -> GeoResult<Self> {
        Self::build(reference, km, GeoOperation::Exactly, Some(tolerance))
    }

    pub fn greater_than(reference: GeoCoordinate, km: f64) -> GeoResult<Self> {
        Self::build(reference, km, GeoOperation::GreaterThan, None)
    }

    pub fn greater_or_equal(reference: GeoCoordinate, km: f64) -> GeoResult<Self> {
        Self::build(reference, km, GeoOperation::GreaterOrEqual, None)
    }

    pub fn less_than(reference: GeoCoordinate, km: f64) -> GeoResult<Self> {
        Self::build(reference, km, GeoOperation::LessThan, None)
    }

    pub fn less_or_equal(reference: GeoCoordinate, km: f64) -> GeoResult<Self> {
        Self::build(reference, km, GeoOperation::LessOrEqual, None)
    }

    pub fn reference(&self) -> &GeoCoordinate {
        &self.reference
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn operation(&self) -> GeoOperation {
        self.operation
    }

    /// The tolerance of an `EXACTLY` filter; zero for every other operation.
    pub fn tolerance_km(&self) -> f64 {
        self.tolerance_km.unwrap_or(0.0)
    }

    /// Evaluates the distance relation against `target`.
    ///
    /// # Errors
    ///
    /// Returns [GeoError::MissingCoordinate] if `target` is incomplete.
    pub fn check(&self, target: &GeoCoordinate) -> GeoResult<bool> {
        target.ensure_complete("target")?;
        let d = self.reference.distance_km(target);
        let result = self.operation.holds(d, self.distance_km, self.tolerance_km());
        log::trace!("{} is {} km from {}, {} -> {}", target, d, self.reference, self, result);
        Ok(result)
    }

    /// Evaluates a target stored as an embedded coordinate document.
    ///
    /// # Errors
    ///
    /// Returns [GeoError::MissingCoordinate] if `target` is null or lacks a
    /// numeric `latitude`/`longitude`.
    pub fn check_value(&self, target: &Value) -> GeoResult<bool> {
        let target = GeoCoordinate::from_value(target).inspect_err(|err| {
            log::error!("Cannot check {} against {}", target, self);
            log::debug!("{}", err);
        })?;
        self.check(&target)
    }

    /// Translates the filter into a distance predicate on the coordinate
    /// field `field_name` of backing store `C`.
    pub fn to_specification<C: GeoQueryContext>(&self, field_name: &str) -> Specification<C> {
        Specification::new(GeoDistanceSpecification::new(field_name, self.clone()))
    }
}

impl PartialEq for GeoDistanceFilter {
    fn eq(&self, other: &Self) -> bool {
        self.operation == other.operation
            && self.reference == other.reference
            && bits(self.distance_km) == bits(other.distance_km)
            && self.tolerance_km.map(bits) == other.tolerance_km.map(bits)
    }
}

impl Eq for GeoDistanceFilter {}

impl Hash for GeoDistanceFilter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.operation.hash(state);
        self.reference.hash(state);
        bits(self.distance_km).hash(state);
        self.tolerance_km.map(bits).hash(state);
    }
}

impl Display for GeoDistanceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tolerance_km {
            Some(tolerance) => write!(
                f,
                "({} {} km ± {} of {})",
                self.operation, self.distance_km, tolerance, self.reference
            ),
            None => write!(f, "({} {} km of {})", self.operation, self.distance_km, self.reference),
        }
    }
}

impl Checkable<GeoCoordinate> for GeoDistanceFilter {
    #[inline]
    fn check(&self, candidate: &GeoCoordinate) -> LarderResult<bool> {
        Ok(GeoDistanceFilter::check(self, candidate)?)
    }
}

impl Checkable<Value> for GeoDistanceFilter {
    #[inline]
    fn check(&self, candidate: &Value) -> LarderResult<bool> {
        Ok(self.check_value(candidate)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder::doc;
    use larder::errors::ErrorKind;
    use larder::filter::FilterChain;
    use std::collections::HashSet;

    fn montreal() -> GeoCoordinate {
        GeoCoordinate::with_label(45.5017, -73.5673, "Montreal Downtown")
    }

    fn toronto() -> GeoCoordinate {
        GeoCoordinate::with_label(43.6532, -79.3832, "Toronto Downtown")
    }

    fn plateau() -> GeoCoordinate {
        GeoCoordinate::with_label(45.5200, -73.5800, "Plateau")
    }

    #[test]
    fn test_montreal_to_toronto() {
        assert!(GeoDistanceFilter::within(montreal(), 600.0).unwrap().check(&toronto()).unwrap());
        assert!(!GeoDistanceFilter::within(montreal(), 500.0).unwrap().check(&toronto()).unwrap());
        assert!(GeoDistanceFilter::outside(montreal(), 500.0).unwrap().check(&toronto()).unwrap());
    }

    #[test]
    fn test_exactly_with_tolerance() {
        let d = montreal().distance_km(&plateau());
        let filter = GeoDistanceFilter::exactly_with_tolerance(montreal(), d, 0.1).unwrap();
        assert!(filter.check(&plateau()).unwrap());
        assert!(GeoDistanceFilter::exactly(montreal(), d + 0.05).unwrap().check(&plateau()).unwrap());
        assert!(!GeoDistanceFilter::exactly(montreal(), d + 0.5).unwrap().check(&plateau()).unwrap());
        assert!(!GeoDistanceFilter::exactly_with_tolerance(montreal(), d + 0.05, 0.0)
            .unwrap()
            .check(&plateau())
            .unwrap());
    }

    #[test]
    fn test_boundary_inclusivity() {
        let d = montreal().distance_km(&toronto());
        let check = |filter: GeoResult<GeoDistanceFilter>| filter.unwrap().check(&toronto()).unwrap();
        assert!(check(GeoDistanceFilter::within(montreal(), d)));
        assert!(!check(GeoDistanceFilter::outside(montreal(), d)));
        assert!(check(GeoDistanceFilter::less_or_equal(montreal(), d)));
        assert!(!check(GeoDistanceFilter::greater_than(montreal(), d)));
        assert!(check(GeoDistanceFilter::greater_or_equal(montreal(), d)));
        assert!(!check(GeoDistanceFilter::less_than(montreal(), d)));
        assert!(check(GeoDistanceFilter::exactly_with_tolerance(montreal(), d, 0.0)));
    }

    #[test]
    fn test_zero_distance() {
        let filter = GeoDistanceFilter::within(montreal(), 0.0).unwrap();
        assert!(filter.check(&montreal()).unwrap());
        assert!(!filter.check(&plateau()).unwrap());
    }

    #[test]
    fn test_invalid_thresholds() {
        let err = GeoDistanceFilter::within(montreal(), -1.0).unwrap_err();
        assert!(matches!(err, GeoError::NegativeDistance(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidValue);

        let err = GeoDistanceFilter::outside(montreal(), f64::NAN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);

        let err = GeoDistanceFilter::exactly_with_tolerance(montreal(), 1.0, -0.1).unwrap_err();
        assert!(matches!(err, GeoError::NegativeTolerance(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_missing_coordinates() {
        let err = GeoDistanceFilter::within(GeoCoordinate::new(f64::NAN, 0.0), 1.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NullArgument);

        let filter = GeoDistanceFilter::within(montreal(), 10.0).unwrap();
        let err = filter.check(&GeoCoordinate::new(45.0, f64::NAN)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NullArgument);
        let err = filter.check_value(&Value::Null).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NullArgument);
    }

    #[test]
    fn test_check_value() {
        let filter = GeoDistanceFilter::within(montreal(), 5.0).unwrap();
        let near = Value::from(doc! { latitude: 45.52, longitude: (-73.58) });
        let far = Value::from(&toronto());
        assert!(filter.check_value(&near).unwrap());
        assert!(!filter.check_value(&far).unwrap());
    }

    #[test]
    fn test_equality_and_hash() {
        let a = GeoDistanceFilter::within(montreal(), 10.0).unwrap();
        let b = GeoDistanceFilter::within(GeoCoordinate::new(45.5017, -73.5673), 10.0).unwrap();
        let c = GeoDistanceFilter::outside(montreal(), 10.0).unwrap();
        let d = GeoDistanceFilter::exactly(montreal(), 10.0).unwrap();
        let e = GeoDistanceFilter::exactly_with_tolerance(montreal(), 10.0, 0.1).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(d, e);

        let set: HashSet<_> = [a, b, c, d, e].into_iter().collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_accessors_and_display() {
        let filter = GeoDistanceFilter::exactly(toronto(), 2.5).unwrap();
        assert_eq!(filter.operation(), GeoOperation::Exactly);
        assert_eq!(filter.distance_km(), 2.5);
        assert_eq!(filter.tolerance_km(), DEFAULT_TOLERANCE_KM);
        assert_eq!(filter.reference(), &toronto());
        assert_eq!(
            filter.to_string(),
            "(EXACTLY 2.5 km ± 0.1 of Toronto Downtown (43.6532, -79.3832))"
        );
        let filter = GeoDistanceFilter::within(GeoCoordinate::new(1.0, 2.0), 3.0).unwrap();
        assert_eq!(filter.to_string(), "(WITHIN 3 km of (1, 2))");
        assert_eq!(filter.tolerance_km(), 0.0);
    }

    #[test]
    fn test_in_filter_chain() {
        let chain: FilterChain<GeoCoordinate> = FilterChain::new()
            .add(GeoDistanceFilter::within(montreal(), 600.0).unwrap())
            .add(GeoDistanceFilter::outside(montreal(), 5.0).unwrap());
        assert!(chain.check(&toronto()).unwrap());
        assert!(!chain.check(&plateau()).unwrap());
        let err = chain.check(&GeoCoordinate::new(f64::NAN, 0.0)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NullArgument);
    }

    #[test]
    fn test_operation_serde_names() {
        assert_eq!(serde_json::to_string(&GeoOperation::LessOrEqual).unwrap(), "\"LESS_OR_EQUAL\"");
        let op: GeoOperation = serde_json::from_str("\"OUTSIDE\"").unwrap();
        assert_eq!(op, GeoOperation::Outside);
    }
}

use std::fmt::{self, Display};

use larder::common::Value;
use larder::errors::{ErrorKind, LarderError, LarderResult};
use larder::specification::{QueryContext, SpecificationProvider};
use larder::store::{DocumentContext, DocumentPredicate, SqlContext, SqlFragment};

use crate::coordinate::EARTH_RADIUS_KM;
use crate::{GeoCoordinate, GeoDistanceFilter, GeoOperation};

/// A backing store that can evaluate great-circle distances.
pub trait GeoQueryContext: QueryContext {
    /// `distance(reference, field) <operation> km`.
    ///
    /// `tolerance` is only meaningful for [GeoOperation::Exactly]. A record
    /// whose coordinate is missing never matches.
    fn distance(
        &self,
        field: &str,
        reference: &GeoCoordinate,
        operation: GeoOperation,
        km: f64,
        tolerance: f64,
    ) -> LarderResult<Self::Expr>;
}

/// Translation of a [GeoDistanceFilter] for a named coordinate field.
pub(crate) struct GeoDistanceSpecification {
    field_name: String,
    filter: GeoDistanceFilter,
}

impl GeoDistanceSpecification {
    pub(crate) fn new(field_name: &str, filter: GeoDistanceFilter) -> Self {
        GeoDistanceSpecification {
            field_name: field_name.to_string(),
            filter,
        }
    }
}

impl Display for GeoDistanceSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filter = self.filter.to_string();
        // "(WITHIN 5 km of ...)" becomes "(location WITHIN 5 km of ...)"
        write!(f, "({} {}", self.field_name, filter.trim_start_matches('('))
    }
}

impl<C: GeoQueryContext> SpecificationProvider<C> for GeoDistanceSpecification {
    fn to_predicate(&self, context: &C) -> LarderResult<C::Expr> {
        context.distance(
            &self.field_name,
            self.filter.reference(),
            self.filter.operation(),
            self.filter.distance_km(),
            self.filter.tolerance_km(),
        )
    }
}

/// The coordinate field holds an embedded document with `latitude` and
/// `longitude`.
impl GeoQueryContext for DocumentContext {
    fn distance(
        &self,
        field: &str,
        reference: &GeoCoordinate,
        operation: GeoOperation,
        km: f64,
        tolerance: f64,
    ) -> LarderResult<DocumentPredicate> {
        if field.is_empty() {
            log::error!("Coordinate field name cannot be empty");
            return Err(LarderError::new(
                "Coordinate field name cannot be empty",
                ErrorKind::InvalidFieldName,
            ));
        }

        let field = field.to_string();
        let reference = reference.clone();
        Ok(DocumentPredicate::new(move |doc| {
            match GeoCoordinate::from_value(&doc.get(&field)) {
                Ok(target) => operation.holds(reference.distance_km(&target), km, tolerance),
                Err(_) => false,
            }
        }))
    }
}

/// The coordinate field `f` is stored as the columns `f_latitude` and
/// `f_longitude`; the haversine formula is evaluated by the database.
impl GeoQueryContext for SqlContext {
    fn distance(
        &self,
        field: &str,
        reference: &GeoCoordinate,
        operation: GeoOperation,
        km: f64,
        tolerance: f64,
    ) -> LarderResult<SqlFragment> {
        let latitude = self.column(&format!("{}_latitude", field))?;
        let longitude = self.column(&format!("{}_longitude", field))?;

        let distance = format!(
            "({radius} * 2 * ASIN(LEAST(1, SQRT(POWER(SIN(RADIANS({lat} - ?) / 2), 2) + \
             COS(RADIANS(?)) * COS(RADIANS({lat})) * POWER(SIN(RADIANS({lon} - ?) / 2), 2)))))",
            radius = EARTH_RADIUS_KM,
            lat = latitude,
            lon = longitude,
        );
        let mut params = vec![
            Value::from(reference.latitude()),
            Value::from(reference.latitude()),
            Value::from(reference.longitude()),
            Value::from(km),
        ];

        let sql = match operation {
            GeoOperation::Within | GeoOperation::LessOrEqual => format!("{} <= ?", distance),
            GeoOperation::Outside | GeoOperation::GreaterThan => format!("{} > ?", distance),
            GeoOperation::GreaterOrEqual => format!("{} >= ?", distance),
            GeoOperation::LessThan => format!("{} < ?", distance),
            GeoOperation::Exactly => {
                params.push(Value::from(tolerance));
                format!("ABS({} - ?) <= ?", distance)
            }
        };
        Ok(SqlFragment::new(sql, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder::doc;
    use larder::filter::field;
    use larder::specification::{combinator, Specification};
    use larder::store::MemoryStore;

    fn montreal() -> GeoCoordinate {
        GeoCoordinate::new(45.5017, -73.5673)
    }

    fn set_up() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert(doc! {
            title: "Bagels",
            location: { latitude: 45.5200, longitude: (-73.5800) },
        });
        store.insert(doc! {
            title: "Soup",
            location: { latitude: 43.6532, longitude: (-79.3832) },
        });
        store.insert(doc! { title: "No address" });
        store.insert(doc! { title: "Half address", location: { latitude: 45.5 } });
        store
    }

    #[test]
    fn test_document_context_distance() {
        let store = set_up();
        let near: Specification<DocumentContext> =
            GeoDistanceFilter::within(montreal(), 10.0).unwrap().to_specification("location");
        let found = store.find(Some(&near)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("title"), Value::from("Bagels"));

        let far: Specification<DocumentContext> =
            GeoDistanceFilter::outside(montreal(), 10.0).unwrap().to_specification("location");
        assert_eq!(store.count(Some(&far)).unwrap(), 1);
    }

    #[test]
    fn test_missing_coordinates_never_match_but_negation_does() {
        let store = set_up();
        let near: Specification<DocumentContext> =
            GeoDistanceFilter::within(montreal(), 10_000.0).unwrap().to_specification("location");
        assert_eq!(store.count(Some(&near)).unwrap(), 2);
        assert_eq!(store.count(combinator::not(Some(near)).as_ref()).unwrap(), 2);
    }

    #[test]
    fn test_combined_with_scalar_filters() {
        let store = set_up();
        let spec = combinator::and([
            Some(GeoDistanceFilter::within(montreal(), 1_000.0).unwrap().to_specification("location")),
            Some(field("title").ne("Bagels").unwrap()),
        ]);
        let found = store.find(spec.as_ref()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("title"), Value::from("Soup"));
    }

    #[test]
    fn test_empty_field_name() {
        let spec: Specification<DocumentContext> =
            GeoDistanceFilter::within(montreal(), 1.0).unwrap().to_specification("");
        let err = spec.to_predicate(&DocumentContext::new()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidFieldName);
    }

    #[test]
    fn test_sql_rendering() {
        let spec: Specification<SqlContext> =
            GeoDistanceFilter::within(montreal(), 5.0).unwrap().to_specification("pickup");
        let fragment = spec.to_predicate(&SqlContext::new().with_alias("d")).unwrap();
        assert_eq!(
            fragment.sql(),
            "(6371 * 2 * ASIN(LEAST(1, SQRT(POWER(SIN(RADIANS(d.pickup_latitude - ?) / 2), 2) + \
             COS(RADIANS(?)) * COS(RADIANS(d.pickup_latitude)) * \
             POWER(SIN(RADIANS(d.pickup_longitude - ?) / 2), 2))))) <= ?"
        );
        assert_eq!(
            fragment.params(),
            &[Value::F64(45.5017), Value::F64(45.5017), Value::F64(-73.5673), Value::F64(5.0)]
        );
    }

    #[test]
    fn test_sql_exactly_binds_tolerance() {
        let spec: Specification<SqlContext> =
            GeoDistanceFilter::exactly(montreal(), 2.0).unwrap().to_specification("pickup");
        let fragment = spec.to_predicate(&SqlContext::new()).unwrap();
        assert!(fragment.sql().starts_with("ABS((6371 * 2 * ASIN(LEAST(1, SQRT("));
        assert!(fragment.sql().ends_with(" - ?) <= ?"));
        assert_eq!(fragment.params().len(), 5);
        assert_eq!(fragment.params()[4], Value::F64(0.1));
    }

    #[test]
    fn test_sql_rejects_bad_field() {
        let spec: Specification<SqlContext> =
            GeoDistanceFilter::outside(montreal(), 5.0).unwrap().to_specification("pick up");
        let err = spec.to_predicate(&SqlContext::new()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidFieldName);
    }

    #[test]
    fn test_display() {
        let spec: Specification<DocumentContext> =
            GeoDistanceFilter::outside(GeoCoordinate::new(1.0, 2.0), 3.0).unwrap().to_specification("location");
        assert_eq!(spec.to_string(), "(location OUTSIDE 3 km of (1, 2))");
    }
}

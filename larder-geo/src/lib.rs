//! # Larder Geo - great-circle distance filters for Larder
//!
//! This crate adds distance filtering over latitude/longitude coordinates
//! to Larder.
//!
//! ## Features
//!
//! - **Haversine Distance**: kilometers on a sphere of radius 6371 km
//! - **Seven Relations**: within, outside, exactly (with tolerance) and the
//!   four ordered comparisons
//! - **Backing Stores**: translation to the in-memory [DocumentContext] and
//!   to SQL through [GeoQueryContext]
//! - **Fluent API**: `geo_field("location").within(point, 5.0)`
//!
//! ## Quick Start
//!
//! ```rust
//! use larder::doc;
//! use larder::specification::Specification;
//! use larder::store::{DocumentContext, MemoryStore};
//! use larder_geo::{geo_field, GeoCoordinate, GeoDistanceFilter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let montreal = GeoCoordinate::new(45.5017, -73.5673);
//! let plateau = GeoCoordinate::new(45.5200, -73.5800);
//!
//! // in memory
//! let d = montreal.distance_km(&plateau);
//! assert!(GeoDistanceFilter::exactly(montreal.clone(), d)?.check(&plateau)?);
//!
//! // against a backing store
//! let store = MemoryStore::new();
//! store.insert(doc! { title: "Bagels", location: { latitude: 45.52, longitude: (-73.58) } });
//! let nearby: Specification<DocumentContext> = geo_field("location").within(montreal, 5.0)?;
//! assert_eq!(store.count(Some(&nearby))?, 1);
//! # Ok(())
//! # }
//! ```
//!
//! [DocumentContext]: larder::store::DocumentContext

mod coordinate;
mod errors;
mod filter;
pub mod fluent;
mod specification;

pub use coordinate::{haversine_km, GeoCoordinate, EARTH_RADIUS_KM};
pub use errors::{GeoError, GeoResult};
pub use filter::{GeoDistanceFilter, GeoOperation, DEFAULT_TOLERANCE_KM};
pub use fluent::{geo_field, GeoFluentField};
pub use specification::GeoQueryContext;

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

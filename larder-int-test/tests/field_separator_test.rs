//! The field separator is process-wide, so this file holds a single test and
//! builds into its own test binary.

use larder::common::Value;
use larder::doc;
use larder::filter::field;
use larder::larder_config::LarderConfig;
use larder::specification::Specification;
use larder::store::{Document, DocumentContext, MemoryStore};
use larder_geo::{geo_field, GeoCoordinate};
use larder_int_test::test_util::{init_logging, montreal, plateau, toronto};

#[test]
fn test_custom_separator_drives_embedded_paths() {
    init_logging();

    LarderConfig::new().field_separator("/").apply().unwrap();
    assert_eq!(LarderConfig::current_field_separator(), "/");

    let mut listing = Document::new();
    listing.put("pickup/address/city", "Montreal").unwrap();
    listing.put("pickup/location", Value::from(&plateau())).unwrap();
    listing.put("pickup.note", "back door").unwrap();
    assert_eq!(listing.get("pickup/address/city"), Value::from("Montreal"));
    assert!(listing.get("pickup").as_document().is_some());
    assert_eq!(listing.keys(), vec!["pickup", "pickup.note"]);
    assert!(listing.get("pickup.address.city").is_null());

    let mut elsewhere = Document::new();
    elsewhere.put("pickup/address/city", "Toronto").unwrap();
    elsewhere.put("pickup/location", Value::from(&toronto())).unwrap();

    let store = MemoryStore::new();
    store.insert(listing);
    store.insert(elsewhere);

    let in_city: Specification<DocumentContext> = field("pickup/address/city").eq("Montreal").unwrap();
    assert_eq!(store.count(Some(&in_city)).unwrap(), 1);
    let dotted: Specification<DocumentContext> = field("pickup.address.city").eq("Montreal").unwrap();
    assert_eq!(store.count(Some(&dotted)).unwrap(), 0);

    let nearby: Specification<DocumentContext> = geo_field("pickup/location").within(montreal(), 5.0).unwrap();
    assert_eq!(store.count(Some(&nearby)).unwrap(), 1);

    // a separator occurring inside plain field names
    LarderConfig::new().field_separator("e").apply().unwrap();
    let value = Value::from(&montreal());
    assert_eq!(
        value.as_document().unwrap().keys(),
        vec!["label", "latitude", "longitude"]
    );
    let coordinate = GeoCoordinate::from_value(&value).unwrap();
    assert_eq!(coordinate, montreal());
    assert_eq!(coordinate.label(), Some("Montreal Downtown"));
    assert_eq!(doc! { latitude: 1.5, longitude: 2.5 }.keys(), vec!["latitude", "longitude"]);

    LarderConfig::new().apply().unwrap();
    assert_eq!(LarderConfig::current_field_separator(), ".");
}

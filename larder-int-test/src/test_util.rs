use larder::common::Value;
use larder::errors::{ErrorKind, LarderError, LarderResult};
use larder::store::{Document, MemoryStore};
use larder_geo::GeoCoordinate;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::sync::Once;
use std::time::Instant;

static LOGGING: Once = Once::new();

/// Category codes used by the donation catalogue.
pub const CATEGORIES: [&str; 6] = [
    "FRUITS_VEGETABLES",
    "DAIRY_COLD",
    "BAKERY_PASTRY",
    "FROZEN",
    "PANTRY",
    "PREPARED_MEALS",
];

/// Seed of the shared catalogue, so failures reproduce.
pub const CATALOGUE_SEED: u64 = 0x1a7d_e2;

pub const CATALOGUE_SIZE: usize = 200;

pub fn montreal() -> GeoCoordinate {
    GeoCoordinate::with_label(45.5017, -73.5673, "Montreal Downtown")
}

pub fn toronto() -> GeoCoordinate {
    GeoCoordinate::with_label(43.6532, -79.3832, "Toronto Downtown")
}

pub fn plateau() -> GeoCoordinate {
    GeoCoordinate::with_label(45.5200, -73.5800, "Plateau")
}

pub fn init_logging() {
    LOGGING.call_once(colog::init);
}

/// Runs a test between a setup and a teardown step.
///
/// Teardown runs even when the test fails; any failure panics with the
/// step that failed and the error.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> LarderResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> LarderResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> LarderResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    init_logging();
    let start_time = Instant::now();

    let result = std::panic::catch_unwind(|| match before() {
        Ok(ctx) => match test(ctx.clone()) {
            Ok(_) => after(ctx).map_err(|e| format!("After run failed: {:?}", e)),
            Err(e) => {
                let _ = after(ctx);
                Err(format!("Test failed: {:?}", e))
            }
        },
        Err(e) => Err(format!("Before run failed: {:?}", e)),
    });

    let elapsed = start_time.elapsed();
    let error = match result {
        Ok(Ok(_)) => return,
        Ok(Err(e)) => e,
        Err(panic_err) => {
            if let Some(s) = panic_err.downcast_ref::<&str>() {
                format!("Panic: {}", s)
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                format!("Panic: {}", s)
            } else {
                "Panic: unknown payload".to_string()
            }
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Took {:?}", elapsed);
    eprintln!("{}", error);
    eprintln!("=====================================================\n");
    panic!("Test failed: {}", error);
}

/// A surplus-food listing as the catalogue generates it.
#[derive(Debug, Clone)]
pub struct Donation {
    pub title: String,
    pub quantity: i32,
    pub categories: Vec<String>,
    pub location: Option<GeoCoordinate>,
    pub verified: bool,
}

impl Donation {
    pub fn to_document(&self) -> LarderResult<Document> {
        let mut doc = Document::new();
        doc.put("title", self.title.as_str())?;
        doc.put("quantity", self.quantity)?;
        doc.put("categories", self.categories.clone())?;
        doc.put("verified", self.verified)?;
        if let Some(location) = &self.location {
            doc.put("location", Value::from(location))?;
        }
        Ok(doc)
    }
}

/// Generates `count` donations scattered around Montreal, with a few far
/// away and a few without a location.
pub fn random_donations(seed: u64, count: usize) -> Vec<Donation> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let size = rng.random_range(0..=4);
            let mut categories: Vec<String> = (0..size)
                .filter_map(|_| CATEGORIES.choose(&mut rng))
                .map(|c| c.to_string())
                .collect();
            // some listings repeat a category
            if size > 0 && rng.random_bool(0.1) {
                categories.push(categories[0].clone());
            }

            let location = match rng.random_range(0..10) {
                0 => None,
                1 => Some(GeoCoordinate::new(
                    rng.random_range(-60.0..60.0),
                    rng.random_range(-170.0..170.0),
                )),
                _ => Some(GeoCoordinate::new(
                    45.5017 + rng.random_range(-0.3..0.3),
                    -73.5673 + rng.random_range(-0.4..0.4),
                )),
            };

            Donation {
                title: format!("Donation {}", i),
                quantity: rng.random_range(0..=60),
                categories,
                location,
                verified: rng.random_bool(0.5),
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct TestContext {
    store: MemoryStore,
    donations: Vec<Donation>,
}

impl TestContext {
    pub fn new(store: MemoryStore, donations: Vec<Donation>) -> Self {
        Self { store, donations }
    }

    pub fn store(&self) -> MemoryStore {
        self.store.clone()
    }

    pub fn donations(&self) -> &[Donation] {
        &self.donations
    }

    /// Titles of the catalogue entries accepted by `predicate`, in catalogue
    /// order.
    pub fn expected_titles<F>(&self, predicate: F) -> LarderResult<Vec<String>>
    where
        F: Fn(&Donation) -> LarderResult<bool>,
    {
        let mut titles = Vec::new();
        for donation in &self.donations {
            if predicate(donation)? {
                titles.push(donation.title.clone());
            }
        }
        Ok(titles)
    }
}

/// Titles of found documents, in store order.
pub fn titles(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .filter_map(|d| d.get("title").as_string().cloned())
        .collect()
}

pub fn create_test_context() -> LarderResult<TestContext> {
    let donations = random_donations(CATALOGUE_SEED, CATALOGUE_SIZE);
    let store = MemoryStore::new();
    for donation in &donations {
        store.insert(donation.to_document()?);
    }

    if store.size() != donations.len() {
        return Err(LarderError::new(
            "Catalogue was not fully inserted",
            ErrorKind::InternalError,
        ));
    }
    Ok(TestContext::new(store, donations))
}

pub fn cleanup(ctx: TestContext) -> LarderResult<()> {
    log::debug!("Discarding catalogue of {} donations", ctx.store.size());
    Ok(())
}

use larder::filter::{field, FilterChain, ScalarFilter, SetMembershipFilter};
use larder::specification::{combinator, Specification};
use larder::store::DocumentContext;
use larder_geo::{GeoCoordinate, GeoDistanceFilter};
use larder_int_test::test_util::{cleanup, create_test_context, montreal, run_test, titles, toronto};
use std::sync::Barrier;
use std::thread;

#[test]
fn test_shared_filters_across_threads() {
    run_test(
        create_test_context,
        |ctx| {
            let nearby = GeoDistanceFilter::within(montreal(), 600.0)?;
            let fresh = SetMembershipFilter::contains_any(["FRUITS_VEGETABLES", "DAIRY_COLD"])?;
            let chain: FilterChain<i32> = FilterChain::new()
                .add(ScalarFilter::greater_than(0)?)
                .add(ScalarFilter::less_or_equal(50)?);

            let num_threads = 8;
            let barrier = Barrier::new(num_threads);
            let results: Vec<(bool, bool, usize)> = thread::scope(|scope| {
                let handles: Vec<_> = (0..num_threads)
                    .map(|_| {
                        scope.spawn(|| {
                            barrier.wait();
                            let near = nearby.check(&toronto()).unwrap();
                            let matched = fresh.check(&["DAIRY_COLD"]).unwrap();
                            let accepted = ctx
                                .donations()
                                .iter()
                                .filter(|d| chain.check(&d.quantity).unwrap())
                                .count();
                            (near, matched, accepted)
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let expected = ctx
                .donations()
                .iter()
                .filter(|d| d.quantity > 0 && d.quantity <= 50)
                .count();
            assert_eq!(results.len(), num_threads);
            for result in results {
                assert_eq!(result, (true, true, expected));
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_concurrent_combination_does_not_interfere() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let verified: Specification<DocumentContext> = field("verified").eq(true)?;
            let large: Specification<DocumentContext> = field("quantity").gte(30)?;
            let verified_text = verified.to_string();

            let counts: Vec<(usize, usize)> = thread::scope(|scope| {
                let handles: Vec<_> = (0..6)
                    .map(|i| {
                        let store = store.clone();
                        let verified = verified.clone();
                        let large = large.clone();
                        scope.spawn(move || {
                            let spec = if i % 2 == 0 {
                                combinator::and([Some(verified), Some(large)])
                            } else {
                                combinator::or([Some(verified), Some(large)])
                            };
                            (i, store.count(spec.as_ref()).unwrap())
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let both = ctx.donations().iter().filter(|d| d.verified && d.quantity >= 30).count();
            let either = ctx.donations().iter().filter(|d| d.verified || d.quantity >= 30).count();
            for (i, count) in counts {
                assert_eq!(count, if i % 2 == 0 { both } else { either });
            }

            // inputs are untouched by the combinations
            assert_eq!(verified.to_string(), verified_text);
            assert_eq!(
                titles(&store.find(Some(&verified))?).len(),
                ctx.donations().iter().filter(|d| d.verified).count()
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_inserts_while_querying() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let initial = store.size();
            let spec: Specification<DocumentContext> = field("quantity").gte(0)?;

            thread::scope(|scope| {
                for t in 0..4 {
                    let store = store.clone();
                    scope.spawn(move || {
                        for i in 0..25 {
                            let mut doc = larder::store::Document::new();
                            doc.put("title", format!("Extra {}-{}", t, i)).unwrap();
                            doc.put("quantity", i).unwrap();
                            store.insert(doc);
                        }
                    });
                }
                for _ in 0..4 {
                    let store = store.clone();
                    let spec = spec.clone();
                    scope.spawn(move || {
                        let count = store.count(Some(&spec)).unwrap();
                        assert!(count >= initial && count <= initial + 100);
                    });
                }
            });

            assert_eq!(store.size(), initial + 100);
            assert_eq!(store.count(Some(&spec))?, initial + 100);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_coordinates_are_shareable() {
    run_test(
        create_test_context,
        |_ctx| {
            let reference = GeoCoordinate::new(45.5017, -73.5673);
            let distances: Vec<f64> = thread::scope(|scope| {
                let handles: Vec<_> = (0..4)
                    .map(|_| scope.spawn(|| reference.distance_km(&toronto())))
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });
            assert!(distances.windows(2).all(|w| w[0] == w[1]));
            Ok(())
        },
        cleanup,
    )
}

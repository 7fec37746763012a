//! # Concurrency Tests
//!
//! Producers insert dependency chains from several tasks while the scheduler
//! keeps ticking. Every item must be submitted exactly once and, with
//! dependency-closed selection, strictly after its dependency.

#[cfg(test)]
mod tests {
    use crate::fixtures::RecordingSink;
    use bundler_engine::domain::invariants::{invariant_profit_order, invariant_within_budget};
    use bundler_engine::{
        BundleEngine, BundleEngineApi, EngineConfig, Item, ItemId, ResourceBudget, SelectionMode,
    };
    use std::collections::HashMap;
    use std::sync::Arc;

    const PRODUCERS: usize = 4;
    const ITEMS_PER_PRODUCER: u64 = 250;

    fn chain_item(producer: usize, n: u64) -> Item {
        let deps: Vec<String> = if n == 0 {
            Vec::new()
        } else {
            vec![format!("p{producer}-{:04}", n - 1)]
        };
        Item::new(
            format!("p{producer}-{n:04}"),
            format!("0xProducer{producer}"),
            "0xRouter",
            1u64.into(),
            ((n * 7919) % 1_000 + 1).into(),
            n,
        )
        .with_dependencies(deps)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_producers_race_scheduler() {
        let sink = Arc::new(RecordingSink::default());
        let config = EngineConfig {
            budget: ResourceBudget::with_count(16).unwrap(),
            selection: SelectionMode::DependencyClosed,
            ..EngineConfig::default()
        };
        let engine = Arc::new(BundleEngine::new(config.clone(), sink.clone()).unwrap());

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|producer| {
                let engine = Arc::clone(&engine);
                tokio::spawn(async move {
                    for n in 0..ITEMS_PER_PRODUCER {
                        engine.insert(chain_item(producer, n)).unwrap();
                        if n % 16 == 0 {
                            tokio::task::yield_now().await;
                        }
                    }
                })
            })
            .collect();

        let scheduler = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                for _ in 0..40 {
                    engine.tick().await.unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };

        for producer in producers {
            producer.await.unwrap();
        }
        scheduler.await.unwrap();
        while engine.store().pending_count() > 0 {
            engine.tick().await.unwrap();
        }

        // (bundle index, position) of every submitted item
        let mut placed: HashMap<ItemId, (usize, usize)> = HashMap::new();
        for (index, bundle) in sink.bundles().iter().enumerate() {
            assert!(invariant_within_budget(bundle, &config.budget));
            assert!(invariant_profit_order(bundle));
            for (position, item) in bundle.items.iter().enumerate() {
                assert!(placed.insert(item.id.clone(), (index, position)).is_none());
            }
        }

        assert_eq!(placed.len(), PRODUCERS * ITEMS_PER_PRODUCER as usize);
        for producer in 0..PRODUCERS {
            for n in 1..ITEMS_PER_PRODUCER {
                let parent = placed[&ItemId::from(format!("p{producer}-{:04}", n - 1))];
                let child = placed[&ItemId::from(format!("p{producer}-{n:04}"))];
                assert!(parent < child, "p{producer}-{n:04} placed before its dependency");
            }
        }
    }

    #[test]
    fn test_snapshots_consistent_under_writes() {
        let engine = Arc::new(
            BundleEngine::new(EngineConfig::default(), Arc::new(RecordingSink::default())).unwrap(),
        );

        let writers: Vec<_> = (0..PRODUCERS)
            .map(|producer| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    for n in 0..ITEMS_PER_PRODUCER {
                        engine.insert(chain_item(producer, n)).unwrap();
                    }
                })
            })
            .collect();

        for _ in 0..100 {
            let view = engine.store().snapshot();
            // A dependent is only ever inserted after its dependency.
            for (_, item) in view.iter() {
                for dep in &item.dependencies {
                    assert!(view.contains(dep), "{} visible without {}", item.id, dep);
                }
            }
        }

        for writer in writers {
            writer.join().unwrap();
        }
        assert_eq!(engine.store().len(), PRODUCERS * ITEMS_PER_PRODUCER as usize);
    }
}

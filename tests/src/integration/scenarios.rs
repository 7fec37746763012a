//! # End-to-End Scenarios
//!
//! 1. **Budgeted Bundle**: A/B/C with a count and cost budget
//! 2. **Two-Cycle**: X and Y depend on each other
//! 3. **Sink Failure**: a refused bundle leaves the store untouched
//! 4. **Late Arrival**: a dependent arriving after its dependency was bundled
//! 5. **Priority Strategy**: max-heap drain
//! 6. **Property**: draining a random DAG submits every item exactly once

#[cfg(test)]
mod tests {
    use crate::fixtures::{budget, item, random_dag, RecordingSink};
    use bundler_engine::domain::invariants::{
        invariant_completeness, invariant_dependency_order, invariant_profit_order,
        invariant_within_budget,
    };
    use bundler_engine::{
        resolve, select, Amount, BundleEngine, BundleEngineApi, EngineConfig, EngineError,
        ItemId, ItemStore, ResourceBudget,
    };
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn ids(items: &[bundler_engine::Item]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    fn engine(budget: ResourceBudget) -> (BundleEngine, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let engine = BundleEngine::new(EngineConfig::with_budget(budget), sink.clone()).unwrap();
        (engine, sink)
    }

    // =========================================================================
    // 1. BUDGETED BUNDLE
    // =========================================================================

    #[test]
    fn test_budgeted_bundle_through_components() {
        let store = ItemStore::new();
        store.insert(item("A", 10, 2, &[])).unwrap();
        store.insert(item("B", 8, 3, &["A"])).unwrap();
        store.insert(item("C", 20, 50, &[])).unwrap();

        let view = store.snapshot();
        let resolution = resolve(&view);
        let order = ids(&resolution.order);
        assert!(order.iter().position(|id| *id == "A") < order.iter().position(|id| *id == "B"));

        let bundle = select(&resolution.order, &budget(2, u64::MAX, 10));

        assert_eq!(ids(&bundle.items), vec!["A", "B"]);
        assert_eq!(bundle.total_profit, Amount::from(18u64));
        assert_eq!(bundle.total_cost, Amount::from(5u64));
    }

    #[tokio::test]
    async fn test_budgeted_bundle_through_engine() {
        let (engine, sink) = engine(budget(2, u64::MAX, 10));
        engine.insert(item("C", 20, 50, &[])).unwrap();
        engine.insert(item("B", 8, 3, &["A"])).unwrap();
        engine.insert(item("A", 10, 2, &[])).unwrap();

        let report = engine.tick().await.unwrap();

        assert!(report.diagnostics.is_empty());
        assert_eq!(ids(&report.bundle.items), vec!["A", "B"]);
        assert_eq!(sink.bundles().len(), 1);
        assert_eq!(engine.store().pending_count(), 1);
    }

    // =========================================================================
    // 2. TWO-CYCLE
    // =========================================================================

    #[tokio::test]
    async fn test_two_cycle_resolves_both_once() {
        let (engine, _sink) = engine(ResourceBudget::with_count(5).unwrap());
        engine.insert(item("X", 1, 1, &["Y"])).unwrap();
        engine.insert(item("Y", 1, 1, &["X"])).unwrap();

        let view = engine.store().snapshot();
        let resolution = resolve(&view);
        assert!(invariant_completeness(&resolution.order, &view));
        assert!(resolution.has_cycles());

        let report = engine.tick().await.unwrap();
        assert!(report.cycle_count() >= 1);
        assert_eq!(report.bundle.len(), 2);
    }

    // =========================================================================
    // 3. SINK FAILURE
    // =========================================================================

    #[tokio::test]
    async fn test_sink_failure_is_scoped_to_tick() {
        let (engine, sink) = engine(ResourceBudget::with_count(5).unwrap());
        engine.insert(item("a", 3, 1, &[])).unwrap();
        engine.insert(item("b", 2, 1, &["a"])).unwrap();
        sink.set_refusing(true);

        let err = engine.tick().await.unwrap_err();
        assert!(matches!(err, EngineError::SubmissionFailed { tick: 1, .. }));
        assert_eq!(engine.store().pending_count(), 2);

        sink.set_refusing(false);
        engine.insert(item("c", 1, 1, &[])).unwrap();
        let report = engine.tick().await.unwrap();

        assert_eq!(ids(&report.bundle.items), vec!["a", "b", "c"]);
        assert_eq!(sink.bundles().len(), 1);
    }

    // =========================================================================
    // 4. LATE ARRIVAL
    // =========================================================================

    #[tokio::test]
    async fn test_dependent_arriving_after_dependency_was_bundled() {
        let (engine, sink) = engine(ResourceBudget::with_count(5).unwrap());
        engine.insert(item("parent", 5, 1, &[])).unwrap();
        engine.tick().await.unwrap();

        engine.insert(item("child", 7, 1, &["parent"])).unwrap();
        let report = engine.tick().await.unwrap();

        // The admitted parent still anchors the order but is not resubmitted.
        assert_eq!(report.resolved_count, 2);
        assert!(report.diagnostics.is_empty());
        assert_eq!(ids(&report.bundle.items), vec!["child"]);
        assert_eq!(sink.bundles().len(), 2);
    }

    // =========================================================================
    // 5. PRIORITY STRATEGY
    // =========================================================================

    #[tokio::test]
    async fn test_priority_drain_in_rounds() {
        let (engine, sink) = engine(ResourceBudget::with_count(2).unwrap());
        for (id, cost, profit) in [("0xTx1", 50, 200), ("0xTx2", 40, 250), ("0xTx3", 60, 300)] {
            engine.add_independent(item(id, profit, cost, &[])).unwrap();
        }

        let first = engine.drain_priority().await.unwrap();
        let second = engine.drain_priority().await.unwrap();
        let third = engine.drain_priority().await.unwrap();

        assert_eq!(ids(&first.bundle.items), vec!["0xTx3", "0xTx2"]);
        assert_eq!(ids(&second.bundle.items), vec!["0xTx1"]);
        assert!(!third.submitted());
        assert_eq!(sink.bundles().len(), 2);
    }

    // =========================================================================
    // 6. PROPERTY
    // =========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_drain_submits_every_item_once(seed in any::<u64>(), n in 1usize..80, count in 1usize..12) {
            let mut rng = StdRng::seed_from_u64(seed);
            let items = random_dag(&mut rng, n, 3);
            let view = bundler_engine::GraphView::from_items(items.clone());
            prop_assert!(invariant_dependency_order(&resolve(&view).order, &view));

            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let budget = ResourceBudget::with_count(count).unwrap();
            let (engine, sink) = engine(budget.clone());
            for item in items {
                engine.insert(item).unwrap();
            }

            runtime.block_on(async {
                while engine.store().pending_count() > 0 {
                    engine.tick().await.unwrap();
                }
            });

            let mut seen = HashSet::new();
            for bundle in sink.bundles() {
                prop_assert!(invariant_within_budget(&bundle, &budget));
                prop_assert!(invariant_profit_order(&bundle));
                for submitted in &bundle.items {
                    prop_assert!(seen.insert(submitted.id.clone()));
                }
            }
            prop_assert_eq!(seen.len(), n);
            prop_assert!(seen.contains(&ItemId::from("tx000000")));
        }
    }
}

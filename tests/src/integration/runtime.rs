//! # Runtime Flow Tests
//!
//! JSON-lines input through the producer, bundles out of the scheduler.

#[cfg(test)]
mod tests {
    use bundler_engine::{Amount, Bundle, ChannelBundleSink, EngineConfig, ResourceBudget};
    use bundler_runtime::scheduler::run_once;
    use bundler_runtime::{BundlerRuntime, RuntimeConfig, Strategy};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::BufReader;
    use tokio::sync::mpsc;

    fn start(config: RuntimeConfig) -> (BundlerRuntime, mpsc::Receiver<Bundle>) {
        let (sink, receiver) = ChannelBundleSink::new(8);
        (BundlerRuntime::new(config, Arc::new(sink)).unwrap(), receiver)
    }

    async fn next_bundle(receiver: &mut mpsc::Receiver<Bundle>) -> Bundle {
        tokio::time::timeout(Duration::from_secs(5), receiver.recv())
            .await
            .expect("no bundle within timeout")
            .expect("sink channel closed")
    }

    #[tokio::test]
    async fn test_dependency_strategy_end_to_end() {
        let config = RuntimeConfig {
            engine: EngineConfig::with_budget(
                ResourceBudget::new(2, Amount::MAX, Amount::from(1_000_000_000_000u64)).unwrap(),
            ),
            strategy: Strategy::Dependency,
            tick_interval_ms: 10,
        };
        let (runtime, mut receiver) = start(config);
        let input = concat!(
            r#"{"id": "0x1", "origin": "0xAlice", "destination": "0xUniswap", "cost": "200000000000", "value": "500000000000000000000", "profit": "300000000000000000000"}"#,
            "\n",
            r#"{"id": "0x2", "origin": "0xBob", "destination": "0xSushi", "cost": "150000000000", "value": "0x1bc16d674ec80000", "dependencies": ["0x1"]}"#,
            "\n",
            r#"{"id": "0x3", "origin": "0xEve", "destination": "0xCurve", "cost": "2000000000000", "profit": 999}"#,
            "\n",
        );

        let stats = runtime.spawn_producer(BufReader::new(input.as_bytes())).await.unwrap();
        assert_eq!(stats.accepted, 3);

        let scheduler = runtime.spawn_scheduler();
        let bundle = next_bundle(&mut receiver).await;
        runtime.shutdown();
        scheduler.await.unwrap();

        let ids: Vec<_> = bundle.items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["0x1", "0x2"]);
        assert_eq!(bundle.total_cost, Amount::from(350_000_000_000u64));
    }

    #[tokio::test]
    async fn test_priority_strategy_end_to_end() {
        let config = RuntimeConfig {
            engine: EngineConfig::with_budget(ResourceBudget::with_count(2).unwrap()),
            strategy: Strategy::Priority,
            tick_interval_ms: 10,
        };
        let (runtime, mut receiver) = start(config);
        let input = "{\"id\": \"0xTx1\", \"cost\": 50, \"profit\": 200}\n\
                     {\"id\": \"0xTx2\", \"cost\": 40, \"profit\": 250}\n\
                     {\"id\": \"0xTx3\", \"cost\": 60, \"profit\": 300}\n";

        runtime.spawn_producer(BufReader::new(input.as_bytes())).await.unwrap();
        let scheduler = runtime.spawn_scheduler();

        let first = next_bundle(&mut receiver).await;
        let second = next_bundle(&mut receiver).await;
        runtime.shutdown();
        scheduler.await.unwrap();

        let ids = |bundle: &Bundle| -> Vec<String> {
            bundle.items.iter().map(|item| item.id.to_string()).collect()
        };
        assert_eq!(ids(&first), vec!["0xTx3", "0xTx2"]);
        assert_eq!(ids(&second), vec!["0xTx1"]);
        assert!(second.tick > first.tick);
    }

    #[tokio::test]
    async fn test_admission_policy_filters_stream() {
        let mut config = RuntimeConfig::default();
        config.engine.admission.min_profit = Amount::from(100u64);
        config.engine.admission.max_cost = Some(Amount::from(50u64));
        let (runtime, _receiver) = start(config);
        let input = "{\"id\": \"ok\", \"cost\": 10, \"profit\": 100}\n\
                     {\"id\": \"poor\", \"cost\": 10, \"profit\": 99}\n\
                     {\"id\": \"pricey\", \"cost\": 51, \"profit\": 500}\n\
                     {\"id\": \"broken\", \"cost\": \"lots\"}\n";

        let stats = runtime.spawn_producer(BufReader::new(input.as_bytes())).await.unwrap();

        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected, 2);
        assert_eq!(stats.malformed, 1);
        assert_eq!(runtime.engine().store().len(), 1);
    }

    #[tokio::test]
    async fn test_run_once_reports_diagnostics() {
        let (runtime, mut receiver) = start(RuntimeConfig::default());
        let input = "{\"id\": \"x\", \"cost\": 1, \"profit\": 5, \"dependencies\": [\"y\"]}\n\
                     {\"id\": \"y\", \"cost\": 1, \"profit\": 4, \"dependencies\": [\"x\"]}\n\
                     {\"id\": \"z\", \"cost\": 1, \"profit\": 3, \"dependencies\": [\"ghost\"]}\n";
        runtime.spawn_producer(BufReader::new(input.as_bytes())).await.unwrap();
        let engine = runtime.engine();

        let report = run_once(&engine, Strategy::Dependency).await.unwrap();

        assert!(report.submitted());
        assert_eq!(report.resolved_count, 3);
        assert_eq!(report.cycle_count(), 1);
        assert_eq!(report.missing_count(), 1);
        assert_eq!(next_bundle(&mut receiver).await.len(), 3);

        let idle = run_once(&engine, Strategy::Dependency).await.unwrap();
        assert!(!idle.submitted());
    }

    #[tokio::test]
    async fn test_resubmitted_line_is_rejected_after_compaction() {
        let (runtime, mut receiver) = start(RuntimeConfig::default());
        let line = "{\"id\": \"0xTx1\", \"cost\": 1, \"profit\": 5}\n";
        let engine = runtime.engine();

        runtime.spawn_producer(BufReader::new(line.as_bytes())).await.unwrap();
        run_once(&engine, Strategy::Dependency).await.unwrap();
        assert_eq!(next_bundle(&mut receiver).await.len(), 1);
        assert!(engine.store().is_empty());

        let replay = runtime.spawn_producer(BufReader::new(line.as_bytes())).await.unwrap();

        assert_eq!(replay.accepted, 0);
        assert_eq!(replay.rejected, 1);
        assert!(!run_once(&engine, Strategy::Dependency).await.unwrap().submitted());
    }
}

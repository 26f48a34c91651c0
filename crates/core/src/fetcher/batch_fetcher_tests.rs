//! Tests for BatchFetcher wave dispatch and per-miner outcome handling.

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use filmarket_market_data::{
        ChainClient, MarketDataError, MinerInfo, MinerPower, PowerClaim, RegionLookup, RegionMap,
        RegistryRecord, StorageAsk,
    };

    use crate::cycle::StopSignal;
    use crate::fetcher::{BatchFetcher, FetchOutcome, SkipReason};
    use crate::miners::RegistrySnapshot;

    // =========================================================================
    // Mock ChainClient
    // =========================================================================

    #[derive(Clone)]
    enum Ask {
        Price(&'static str),
        Empty,
        Timeout,
        RpcError,
    }

    #[derive(Clone)]
    struct Script {
        peer_id: Option<&'static str>,
        power: Option<&'static str>,
        ask: Ask,
    }

    impl Script {
        fn priced(price: &'static str) -> Self {
            Self {
                peer_id: Some("12D3KooW"),
                power: Some("34359738368"),
                ask: Ask::Price(price),
            }
        }
    }

    #[derive(Default)]
    struct MockChain {
        scripts: HashMap<String, Script>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        info_calls: AtomicUsize,
        ask_calls: AtomicUsize,
        /// Raised on the first call, to simulate a signal arriving mid-batch
        stop_on_call: Mutex<Option<StopSignal>>,
    }

    impl MockChain {
        fn with_scripts(scripts: Vec<(&str, Script)>) -> Self {
            Self {
                scripts: scripts
                    .into_iter()
                    .map(|(miner, script)| (miner.to_string(), script))
                    .collect(),
                ..Self::default()
            }
        }

        fn uniform(count: usize) -> Self {
            Self {
                scripts: (0..count)
                    .map(|i| (miner_id(i), Script::priced("500000000")))
                    .collect(),
                ..Self::default()
            }
        }

        fn script(&self, miner: &str) -> Option<&Script> {
            self.scripts.get(miner)
        }

        /// Hold one request slot open long enough for the rest of the wave
        /// to overlap with it.
        async fn remote_call(&self) {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn miner_id(i: usize) -> String {
        format!("f0{:04}", i)
    }

    #[async_trait]
    impl ChainClient for MockChain {
        fn id(&self) -> &'static str {
            "MOCK_CHAIN"
        }

        async fn miner_info(&self, miner: &str) -> Result<Option<MinerInfo>, MarketDataError> {
            self.info_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(stop) = self.stop_on_call.lock().unwrap().take() {
                stop.stop();
            }

            self.remote_call().await;

            Ok(self.script(miner).map(|s| MinerInfo {
                peer_id: s.peer_id.map(str::to_string),
            }))
        }

        async fn miner_power(&self, miner: &str) -> Result<Option<MinerPower>, MarketDataError> {
            self.remote_call().await;
            Ok(self.script(miner).map(|s| MinerPower {
                miner_power: Some(PowerClaim {
                    quality_adj_power: s.power.map(str::to_string),
                }),
            }))
        }

        async fn query_ask(
            &self,
            _peer_id: &str,
            miner: &str,
        ) -> Result<Option<StorageAsk>, MarketDataError> {
            self.ask_calls.fetch_add(1, Ordering::SeqCst);
            self.remote_call().await;
            match self.script(miner).map(|s| s.ask.clone()) {
                Some(Ask::Price(price)) => Ok(Some(StorageAsk {
                    price: Some(price.to_string()),
                    response: None,
                })),
                Some(Ask::Empty) | None => Ok(None),
                Some(Ask::Timeout) => Err(MarketDataError::Timeout {
                    provider: "MOCK_CHAIN".to_string(),
                }),
                Some(Ask::RpcError) => Err(MarketDataError::Rpc {
                    method: "Filecoin.ClientQueryAsk".to_string(),
                    code: 1,
                    message: "failed to dial".to_string(),
                }),
            }
        }
    }

    struct FixedRegion(&'static str);

    impl RegionLookup for FixedRegion {
        fn region_for(&self, _location: &str) -> Cow<'static, str> {
            Cow::Borrowed(self.0)
        }
    }

    fn fetcher(chain: Arc<MockChain>, wave_size: usize) -> BatchFetcher {
        BatchFetcher::new(chain, Arc::new(RegionMap::new())).with_wave_size(wave_size)
    }

    fn snapshot_of(records: Vec<RegistryRecord>) -> RegistrySnapshot {
        RegistrySnapshot::from_sources(&records, &[])
    }

    fn plain_snapshot(count: usize) -> RegistrySnapshot {
        snapshot_of((0..count).map(|i| RegistryRecord::new(miner_id(i))).collect())
    }

    // =========================================================================
    // Wave dispatch
    // =========================================================================

    #[tokio::test]
    async fn test_waves_bound_concurrency() {
        let chain = Arc::new(MockChain::uniform(25));
        let result = fetcher(chain.clone(), 10)
            .fetch(&plain_snapshot(25), &StopSignal::new())
            .await;

        assert_eq!(result.stats.waves, 3);
        assert_eq!(result.stats.requested, 25);
        assert_eq!(result.stats.dispatched, 25);
        assert_eq!(result.quotes.len(), 25);
        assert!(!result.stats.interrupted);
        // Counted across info, power and ask requests
        assert_eq!(chain.max_in_flight.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_requests_in_flight_never_exceed_wave_size() {
        let chain = Arc::new(MockChain::uniform(10));
        let result = fetcher(chain.clone(), 5)
            .fetch(&plain_snapshot(10), &StopSignal::new())
            .await;

        assert_eq!(result.stats.waves, 2);
        assert_eq!(result.quotes.len(), 10);
        assert_eq!(chain.ask_calls.load(Ordering::SeqCst), 10);
        assert!(chain.max_in_flight.load(Ordering::SeqCst) <= 5);
        assert_eq!(chain.in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wave_size_larger_than_snapshot() {
        let chain = Arc::new(MockChain::uniform(4));
        let result = fetcher(chain.clone(), 10)
            .fetch(&plain_snapshot(4), &StopSignal::new())
            .await;

        assert_eq!(result.stats.waves, 1);
        assert_eq!(chain.max_in_flight.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_empty_snapshot_dispatches_nothing() {
        let chain = Arc::new(MockChain::default());
        let result = fetcher(chain.clone(), 10)
            .fetch(&plain_snapshot(0), &StopSignal::new())
            .await;

        assert_eq!(result.stats.waves, 0);
        assert!(result.quotes.is_empty());
        assert_eq!(chain.info_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_wave_size_has_floor_of_one() {
        let f = fetcher(Arc::new(MockChain::default()), 0);
        assert_eq!(f.wave_size(), 1);
    }

    // =========================================================================
    // Stop handling
    // =========================================================================

    #[tokio::test]
    async fn test_stop_before_batch_dispatches_nothing() {
        let chain = Arc::new(MockChain::uniform(5));
        let stop = StopSignal::new();
        stop.stop();

        let result = fetcher(chain.clone(), 2).fetch(&plain_snapshot(5), &stop).await;

        assert!(result.stats.interrupted);
        assert_eq!(result.stats.waves, 0);
        assert_eq!(result.stats.dispatched, 0);
        assert_eq!(chain.info_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stop_mid_batch_finishes_current_wave() {
        let chain = Arc::new(MockChain::uniform(15));
        let stop = StopSignal::new();
        *chain.stop_on_call.lock().unwrap() = Some(stop.clone());

        let result = fetcher(chain.clone(), 10).fetch(&plain_snapshot(15), &stop).await;

        assert!(result.stats.interrupted);
        assert_eq!(result.stats.waves, 1);
        assert_eq!(result.stats.dispatched, 10);
        assert_eq!(result.quotes.len(), 10);
        assert_eq!(chain.info_calls.load(Ordering::SeqCst), 10);
    }

    // =========================================================================
    // Per-miner outcomes
    // =========================================================================

    #[tokio::test]
    async fn test_missing_capability_or_capacity_is_skipped() {
        let chain = Arc::new(MockChain::with_scripts(vec![
            (
                "f01",
                Script {
                    peer_id: None,
                    ..Script::priced("1")
                },
            ),
            (
                "f02",
                Script {
                    power: None,
                    ..Script::priced("1")
                },
            ),
            (
                "f03",
                Script {
                    power: Some("0"),
                    ..Script::priced("1")
                },
            ),
            ("f04", Script::priced("1")),
        ]));
        let f = fetcher(chain.clone(), 10);
        let snapshot = snapshot_of(vec![
            RegistryRecord::new("f01"),
            RegistryRecord::new("f02"),
            RegistryRecord::new("f03"),
            RegistryRecord::new("f04"),
        ]);

        assert!(matches!(
            f.fetch_one("f01", &snapshot).await,
            FetchOutcome::Skipped(SkipReason::MissingPeerId)
        ));
        assert!(matches!(
            f.fetch_one("f02", &snapshot).await,
            FetchOutcome::Skipped(SkipReason::MissingPower)
        ));
        assert!(matches!(
            f.fetch_one("f03", &snapshot).await,
            FetchOutcome::Skipped(SkipReason::MissingPower)
        ));

        let result = f.fetch(&snapshot, &StopSignal::new()).await;
        assert_eq!(result.stats.skipped, 3);
        assert_eq!(result.quotes.len(), 1);
        assert_eq!(result.quotes[0].miner, "f04");
        // Skipped miners never reach the price-ask lookup
        assert_eq!(chain.ask_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_miner_is_skipped() {
        let chain = Arc::new(MockChain::default());
        let snapshot = snapshot_of(vec![RegistryRecord::new("f0999")]);
        let outcome = fetcher(chain, 10).fetch_one("f0999", &snapshot).await;
        assert!(matches!(
            outcome,
            FetchOutcome::Skipped(SkipReason::MissingPeerId)
        ));
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_the_wave() {
        let chain = Arc::new(MockChain::with_scripts(vec![
            (
                "f01",
                Script {
                    ask: Ask::Timeout,
                    ..Script::priced("1")
                },
            ),
            (
                "f02",
                Script {
                    ask: Ask::RpcError,
                    ..Script::priced("1")
                },
            ),
            (
                "f03",
                Script {
                    ask: Ask::Empty,
                    ..Script::priced("1")
                },
            ),
            ("f04", Script::priced("700000000")),
        ]));
        let snapshot = snapshot_of(vec![
            RegistryRecord::new("f01"),
            RegistryRecord::new("f02"),
            RegistryRecord::new("f03"),
            RegistryRecord::new("f04"),
        ]);

        let result = fetcher(chain, 10).fetch(&snapshot, &StopSignal::new()).await;

        assert_eq!(result.stats.dispatched, 4);
        assert_eq!(result.stats.quoted, 1);
        assert_eq!(result.stats.skipped, 2);
        assert_eq!(result.stats.failed, 1);
        assert_eq!(result.quotes[0].price, "700000000");
    }

    #[tokio::test]
    async fn test_zero_price_is_passed_through() {
        let chain = Arc::new(MockChain::with_scripts(vec![("f01", Script::priced("0"))]));
        let snapshot = snapshot_of(vec![RegistryRecord::new("f01")]);

        let outcome = fetcher(chain, 10).fetch_one("f01", &snapshot).await;
        match outcome {
            FetchOutcome::Quoted(quote) => assert_eq!(quote.price, "0"),
            other => panic!("expected a quote, got {:?}", other),
        }
    }

    // =========================================================================
    // Region assignment
    // =========================================================================

    #[tokio::test]
    async fn test_region_from_location() {
        let chain = Arc::new(MockChain::with_scripts(vec![
            ("f01", Script::priced("1")),
            ("f02", Script::priced("1")),
            ("f03", Script::priced("1")),
        ]));
        let snapshot = snapshot_of(vec![
            RegistryRecord::with_location("f01", "DE"),
            RegistryRecord::new("f02"),
            RegistryRecord::with_location("f03", "ZZ"),
        ]);

        let result = fetcher(chain, 10).fetch(&snapshot, &StopSignal::new()).await;
        let regions: HashMap<_, _> = result
            .quotes
            .iter()
            .map(|q| (q.miner.as_str(), q.region.as_str()))
            .collect();

        assert_eq!(regions["f01"], "Europe");
        assert_eq!(regions["f02"], "Other");
        assert_eq!(regions["f03"], "Other");
    }

    #[tokio::test]
    async fn test_custom_lookup_label_is_kept() {
        let chain = Arc::new(MockChain::with_scripts(vec![("f01", Script::priced("1"))]));
        let snapshot = snapshot_of(vec![RegistryRecord::with_location("f01", "AU")]);
        let f = BatchFetcher::new(chain, Arc::new(FixedRegion("Oceania")));

        match f.fetch_one("f01", &snapshot).await {
            FetchOutcome::Quoted(quote) => assert_eq!(quote.region, "Oceania"),
            other => panic!("expected a quote, got {:?}", other),
        }
    }
}

//! effect executor - runs core effects on the tokio runtime

use faucet_core::{
    ConnectionMonitor, Effect, EnsResolver, Event, KeyValueStore, SettingsStore,
    TransactionDispatcher,
};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// wakes the ui after an event was queued
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// executes the async effects; ui effects stay with the app
pub struct EffectExecutor<S> {
    runtime: Handle,
    settings: Arc<SettingsStore<S>>,
    resolver: Arc<EnsResolver>,
    monitor: Arc<ConnectionMonitor>,
    dispatcher: Arc<TransactionDispatcher>,
    event_tx: mpsc::UnboundedSender<Event>,
    waker: Waker,
}

impl<S: KeyValueStore + 'static> EffectExecutor<S> {
    pub fn new(
        runtime: Handle,
        settings: SettingsStore<S>,
        resolver: EnsResolver,
        monitor: ConnectionMonitor,
        dispatcher: TransactionDispatcher,
        event_tx: mpsc::UnboundedSender<Event>,
        waker: Waker,
    ) -> Self {
        Self {
            runtime,
            settings: Arc::new(settings),
            resolver: Arc::new(resolver),
            monitor: Arc::new(monitor),
            dispatcher: Arc::new(dispatcher),
            event_tx,
            waker,
        }
    }

    /// spawn the work for one effect; the result comes back as an event
    pub fn execute(&self, effect: Effect) {
        let tx = self.event_tx.clone();
        let waker = self.waker.clone();
        let send = move |event: Event| {
            if tx.send(event).is_err() {
                debug!("ui gone, dropping event");
                return;
            }
            waker();
        };

        match effect {
            Effect::ScheduleEnsLookup { generation, delay } => {
                self.runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    send(Event::EnsDebounceElapsed { generation });
                });
            }

            Effect::ResolveEns { generation, name } => {
                let resolver = self.resolver.clone();
                self.runtime.spawn(async move {
                    let result = resolver.resolve(&name).await;
                    send(Event::EnsResolved { generation, result });
                });
            }

            Effect::ProbeConnection { generation, config } => {
                let monitor = self.monitor.clone();
                self.runtime.spawn(async move {
                    let status = monitor.probe(&config).await;
                    send(Event::ProbeFinished { generation, status });
                });
            }

            Effect::TestDraft { generation, config } => {
                let monitor = self.monitor.clone();
                self.runtime.spawn(async move {
                    let status = monitor.probe(&config).await;
                    send(Event::DraftTested { generation, status });
                });
            }

            Effect::SubmitTransfer(request) => {
                let dispatcher = self.dispatcher.clone();
                self.runtime.spawn(async move {
                    let result = dispatcher.dispatch(&request).await;
                    send(Event::TransferFinished(result));
                });
            }

            Effect::PersistSettings(config) => {
                let settings = self.settings.clone();
                self.runtime.spawn_blocking(move || {
                    let result = settings.save(&config).map_err(|e| {
                        warn!("failed to persist settings: {}", e);
                        e.to_string()
                    });
                    send(Event::SettingsPersisted(result));
                });
            }

            Effect::Celebrate | Effect::ShowNotification { .. } => {
                debug!("ui effect reached executor: {:?}", effect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faucet_core::dispatch::TransferRequest;
    use faucet_core::rpc::EthersConnector;
    use faucet_core::{Amount, Generation, GenerationCounter, MemoryStore, RpcConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn executor(
        store: Arc<MemoryStore>,
    ) -> (
        EffectExecutor<Arc<MemoryStore>>,
        mpsc::UnboundedReceiver<Event>,
        Arc<AtomicUsize>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let connector = Arc::new(EthersConnector);
        let executor = EffectExecutor::new(
            Handle::current(),
            SettingsStore::new(store),
            EnsResolver::new(Vec::new()),
            ConnectionMonitor::new(connector.clone()),
            TransactionDispatcher::new(connector),
            tx,
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (executor, rx, wakes)
    }

    fn next_generation() -> Generation {
        GenerationCounter::new().advance()
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_fires_after_delay() {
        let (executor, mut rx, wakes) = executor(Arc::new(MemoryStore::new()));
        let generation = next_generation();
        executor.execute(Effect::ScheduleEnsLookup {
            generation,
            delay: Duration::from_millis(500),
        });

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err());

        assert_eq!(rx.recv().await, Some(Event::EnsDebounceElapsed { generation }));
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_persist_reports_back() {
        let store = Arc::new(MemoryStore::new());
        let (executor, mut rx, _) = executor(store.clone());
        let config = RpcConfig::new("node.lan", Some(8546), true).unwrap();

        executor.execute(Effect::PersistSettings(config.clone()));
        assert_eq!(rx.recv().await, Some(Event::SettingsPersisted(Ok(()))));
        assert_eq!(SettingsStore::new(store).load().unwrap(), config);
    }

    #[tokio::test]
    async fn test_resolve_without_gateways_fails() {
        let (executor, mut rx, _) = executor(Arc::new(MemoryStore::new()));
        let generation = next_generation();
        executor.execute(Effect::ResolveEns {
            generation,
            name: "vitalik.eth".into(),
        });
        assert!(matches!(
            rx.recv().await,
            Some(Event::EnsResolved { result: Err(_), .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_transfer_reports_failure() {
        let (executor, mut rx, _) = executor(Arc::new(MemoryStore::new()));
        // nothing listens on the discard port
        let config = RpcConfig::new("127.0.0.1", Some(9), false).unwrap();
        executor.execute(Effect::SubmitTransfer(TransferRequest {
            config,
            recipient: Default::default(),
            amount: Amount::MIN,
            ens_name: None,
            display_name: None,
        }));

        let Some(Event::TransferFinished(result)) = rx.recv().await else {
            panic!("expected transfer result");
        };
        assert!(!result.success);
        assert!(result.tx_hash.is_none());
        assert!(result.message.contains("127.0.0.1:9"));
    }
}

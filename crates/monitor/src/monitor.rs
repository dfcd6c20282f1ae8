//! The monitoring loop itself

use crate::alert::Alert;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use warden_ledger::PositionLedger;
use warden_ports::{ActivityEvent, ActivityWatcher, BalanceProvider};
use warden_risk::RiskEngine;

/// Monitoring loop configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Interval between polling cycles
    pub check_interval: Duration,
    /// Alert broadcast channel capacity
    pub alert_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(30),
            alert_capacity: 64,
        }
    }
}

/// Everything one cycle needs, cloned into the spawned task
#[derive(Clone)]
struct CycleContext {
    ledger: Arc<Mutex<PositionLedger>>,
    balances: Arc<dyn BalanceProvider>,
    engine: RiskEngine,
    alerts: broadcast::Sender<Alert>,
}

/// Periodic wallet monitor
///
/// Cycles refresh the shared ledger, check every position's protection
/// thresholds and the portfolio's allocation drift, and broadcast alerts.
/// A registered activity watch triggers extra cycles between ticks; if
/// registration fails the loop degrades to polling only.
pub struct MonitoringLoop {
    config: MonitorConfig,
    ledger: Arc<Mutex<PositionLedger>>,
    balances: Arc<dyn BalanceProvider>,
    engine: RiskEngine,
    watcher: Option<Arc<dyn ActivityWatcher>>,
    alerts: broadcast::Sender<Alert>,
    shutdown: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl MonitoringLoop {
    pub fn new(
        config: MonitorConfig,
        ledger: Arc<Mutex<PositionLedger>>,
        balances: Arc<dyn BalanceProvider>,
        engine: RiskEngine,
        watcher: Option<Arc<dyn ActivityWatcher>>,
    ) -> Self {
        let (alerts, _) = broadcast::channel(config.alert_capacity);
        let (shutdown, _) = watch::channel(false);
        Self {
            config,
            ledger,
            balances,
            engine,
            watcher,
            alerts,
            shutdown,
            handle: Mutex::new(None),
        }
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<Alert> {
        self.alerts.subscribe()
    }

    pub async fn is_running(&self) -> bool {
        self.handle
            .lock()
            .await
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Start the loop. A no-op when already running. The first cycle runs
    /// before this returns.
    pub async fn start(&self) {
        let mut slot = self.handle.lock().await;
        if let Some(handle) = slot.as_ref()
            && !handle.is_finished()
        {
            debug!("[MONITOR] Already running, ignoring start");
            return;
        }
        let _ = self.shutdown.send(false);

        let ctx = CycleContext {
            ledger: self.ledger.clone(),
            balances: self.balances.clone(),
            engine: self.engine.clone(),
            alerts: self.alerts.clone(),
        };

        let wallet_id = ctx.ledger.lock().await.wallet_id().to_string();
        info!("[MONITOR] Starting for {wallet_id}");
        Self::run_cycle(&ctx).await;

        let mut events = match &self.watcher {
            Some(watcher) => match watcher.register_watch(&wallet_id).await {
                Ok(subscription) => {
                    info!(
                        "[MONITOR] Watching {wallet_id} via subscription {}",
                        subscription.id
                    );
                    Some(subscription.events)
                }
                Err(e) => {
                    warn!("[MONITOR] Watch registration failed, polling only: {e}");
                    None
                }
            },
            None => None,
        };

        let mut shutdown = self.shutdown.subscribe();
        let period = self.config.check_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Consume the immediate first tick; that cycle already ran
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => Self::run_cycle(&ctx).await,
                    event = Self::next_activity(&mut events) => match event {
                        Some(event) => {
                            debug!("[MONITOR] Activity on {}", event.wallet_id);
                            Self::run_cycle(&ctx).await;
                        }
                        // Stream closed; keep polling
                        None => events = None,
                    },
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("[MONITOR] Loop for {wallet_id} exited");
        });
        *slot = Some(handle);
    }

    /// Cancel future cycles and wait for the loop to exit. An in-flight
    /// cycle finishes; it is never interrupted mid-refresh.
    pub async fn stop(&self) {
        let handle = self.handle.lock().await.take();
        if let Some(handle) = handle {
            let _ = self.shutdown.send(true);
            let _ = handle.await;
        }
    }

    async fn next_activity(
        events: &mut Option<mpsc::Receiver<ActivityEvent>>,
    ) -> Option<ActivityEvent> {
        match events {
            Some(rx) => rx.recv().await,
            None => std::future::pending().await,
        }
    }

    async fn run_cycle(ctx: &CycleContext) {
        let wallet_id = ctx.ledger.lock().await.wallet_id().to_string();

        let balances = match ctx.balances.get_balances(&wallet_id).await {
            Ok(balances) => balances,
            Err(e) => {
                warn!("[MONITOR] Balance refresh failed for {wallet_id}: {e}");
                return;
            }
        };

        let (portfolio, summary) = {
            let mut ledger = ctx.ledger.lock().await;
            let summary = ledger.refresh(&balances);
            (ledger.snapshot(), summary)
        };
        debug!(
            "[MONITOR] {wallet_id}: {} opened, {} updated, {} closed",
            summary.opened.len(),
            summary.updated,
            summary.closed.len()
        );

        for position in &portfolio.positions {
            let check = ctx.engine.check_stop_loss(position);
            if let Some(alert) = Alert::from_check(&wallet_id, position, &check) {
                info!(
                    "[MONITOR] {} triggered: {}",
                    position.symbol,
                    check.reason.as_deref().unwrap_or("threshold crossed")
                );
                let _ = ctx.alerts.send(alert);
            }
        }

        let assessment = ctx.engine.evaluate_risk(&portfolio);
        if let Some(alert) = Alert::from_assessment(&wallet_id, &assessment) {
            info!(
                "[MONITOR] {wallet_id} scored {} with {} warnings",
                assessment.overall_score,
                assessment.warnings.len()
            );
            let _ = ctx.alerts.send(alert);
        }

        let actions = ctx.engine.suggest_rebalance(&portfolio);
        if !actions.is_empty() {
            info!(
                "[MONITOR] {wallet_id} allocation drifted, {} rebalance suggestions",
                actions.len()
            );
            let _ = ctx.alerts.send(Alert::rebalance(&wallet_id, actions));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertKind;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::timeout;
    use warden_core::TokenBalance;
    use warden_ledger::LedgerConfig;
    use warden_ports::{PortResult, WatchSubscription};

    struct ScriptedBalances {
        price: std::sync::Mutex<Decimal>,
        calls: AtomicUsize,
    }

    impl ScriptedBalances {
        fn at(price: Decimal) -> Arc<Self> {
            Arc::new(Self {
                price: std::sync::Mutex::new(price),
                calls: AtomicUsize::new(0),
            })
        }

        fn set_price(&self, price: Decimal) {
            *self.price.lock().unwrap() = price;
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BalanceProvider for ScriptedBalances {
        async fn get_balances(&self, _wallet_id: &str) -> PortResult<Vec<TokenBalance>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let price = *self.price.lock().unwrap();
            Ok(vec![TokenBalance {
                asset_id: "BONK".to_string(),
                ui_amount: dec!(1000),
                price_usd: Some(price),
                value_usd: None,
                symbol: Some("BONK".to_string()),
            }])
        }
    }

    struct OneShotWatcher {
        events: std::sync::Mutex<Option<mpsc::Receiver<ActivityEvent>>>,
    }

    #[async_trait]
    impl ActivityWatcher for OneShotWatcher {
        async fn register_watch(&self, _wallet_id: &str) -> PortResult<WatchSubscription> {
            let events = self.events.lock().unwrap().take().unwrap();
            Ok(WatchSubscription {
                id: "watch-1".to_string(),
                events,
            })
        }
    }

    fn monitor_with(
        balances: Arc<ScriptedBalances>,
        watcher: Option<Arc<dyn ActivityWatcher>>,
        check_interval: Duration,
    ) -> MonitoringLoop {
        let ledger = Arc::new(Mutex::new(PositionLedger::new(
            "wallet-1",
            LedgerConfig::default(),
        )));
        MonitoringLoop::new(
            MonitorConfig {
                check_interval,
                alert_capacity: 16,
            },
            ledger,
            balances,
            RiskEngine::default(),
            watcher,
        )
    }

    #[tokio::test]
    async fn test_stop_loss_breach_raises_alert() {
        let balances = ScriptedBalances::at(dec!(1));
        let monitor = monitor_with(balances.clone(), None, Duration::from_millis(10));
        let mut alerts = monitor.subscribe_alerts();

        // First cycle opens the position at 1 (stop at 0.9), then the
        // price collapses under it
        monitor.start().await;
        balances.set_price(dec!(0.5));

        let alert = timeout(Duration::from_secs(2), async {
            loop {
                // Skip rebalance alerts and tolerate lag on the channel
                if let Ok(alert) = alerts.recv().await
                    && matches!(alert.kind, AlertKind::StopLoss { .. })
                {
                    return alert;
                }
            }
        })
        .await
        .expect("stop-loss alert within the window");

        assert_eq!(alert.wallet_id, "wallet-1");
        match alert.kind {
            AlertKind::StopLoss {
                symbol,
                suggested_action,
                urgency,
                ..
            } => {
                assert_eq!(symbol, "BONK");
                assert_eq!(suggested_action, warden_core::SuggestedAction::SellAll);
                assert_eq!(urgency, warden_core::Urgency::Critical);
            }
            other => panic!("unexpected alert: {other:?}"),
        }

        monitor.stop().await;
    }

    #[tokio::test]
    async fn test_cashless_portfolio_raises_risk_alert() {
        struct CashlessBalances;

        // Five equal volatile holdings: no position over the size cap, so
        // no rebalance suggestion, but zero cash trips the liquidity floor
        #[async_trait]
        impl BalanceProvider for CashlessBalances {
            async fn get_balances(&self, _wallet_id: &str) -> PortResult<Vec<TokenBalance>> {
                Ok(["AAA", "BBB", "CCC", "DDD", "EEE"]
                    .iter()
                    .map(|s| TokenBalance {
                        asset_id: s.to_string(),
                        ui_amount: dec!(100),
                        price_usd: Some(dec!(1)),
                        value_usd: None,
                        symbol: Some(s.to_string()),
                    })
                    .collect())
            }
        }

        let ledger = Arc::new(Mutex::new(PositionLedger::new(
            "wallet-1",
            LedgerConfig::default(),
        )));
        let monitor = MonitoringLoop::new(
            MonitorConfig {
                check_interval: Duration::from_millis(10),
                alert_capacity: 16,
            },
            ledger,
            Arc::new(CashlessBalances),
            RiskEngine::default(),
            None,
        );
        let mut alerts = monitor.subscribe_alerts();
        monitor.start().await;

        let alert = timeout(Duration::from_secs(2), async {
            loop {
                if let Ok(alert) = alerts.recv().await
                    && matches!(alert.kind, AlertKind::Risk { .. })
                {
                    return alert;
                }
            }
        })
        .await
        .expect("risk alert within the window");

        match alert.kind {
            AlertKind::Risk {
                overall_score,
                warnings,
            } => {
                // Liquidity (-10) and volatility (-10) deductions
                assert_eq!(overall_score, dec!(80));
                assert!(warnings.iter().any(|w| w.contains("Low cash reserves")));
            }
            other => panic!("unexpected alert: {other:?}"),
        }

        monitor.stop().await;
    }

    #[tokio::test]
    async fn test_failed_watch_registration_falls_back_to_polling() {
        struct RefusingWatcher;

        #[async_trait]
        impl ActivityWatcher for RefusingWatcher {
            async fn register_watch(&self, _wallet_id: &str) -> PortResult<WatchSubscription> {
                Err(warden_ports::PortError::Unavailable(
                    "webhooks disabled".to_string(),
                ))
            }
        }

        let balances = ScriptedBalances::at(dec!(1));
        let monitor = monitor_with(
            balances.clone(),
            Some(Arc::new(RefusingWatcher)),
            Duration::from_millis(10),
        );

        monitor.start().await;
        let after_start = balances.calls();

        // Interval cycles keep running without the subscription
        timeout(Duration::from_secs(2), async {
            while balances.calls() <= after_start {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("polling cycles after failed registration");

        assert!(monitor.is_running().await);
        monitor.stop().await;
    }

    #[tokio::test]
    async fn test_activity_event_triggers_extra_cycle() {
        let balances = ScriptedBalances::at(dec!(1));
        let (tx, rx) = mpsc::channel(4);
        let watcher = Arc::new(OneShotWatcher {
            events: std::sync::Mutex::new(Some(rx)),
        });

        // An hour-long interval: only activity events can drive cycles
        let monitor = monitor_with(balances.clone(), Some(watcher), Duration::from_secs(3600));
        monitor.start().await;
        let after_start = balances.calls();

        tx.send(ActivityEvent::new("wallet-1", serde_json::json!({})))
            .await
            .unwrap();

        timeout(Duration::from_secs(2), async {
            while balances.calls() <= after_start {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("activity-driven cycle");

        monitor.stop().await;
    }

    #[tokio::test]
    async fn test_start_is_idempotent_and_stop_halts_cycles() {
        let balances = ScriptedBalances::at(dec!(1));
        let monitor = monitor_with(balances.clone(), None, Duration::from_millis(10));

        monitor.start().await;
        assert!(monitor.is_running().await);
        monitor.start().await;
        assert!(monitor.is_running().await);

        monitor.stop().await;
        assert!(!monitor.is_running().await);

        let settled = balances.calls();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(balances.calls(), settled);
    }

    #[tokio::test]
    async fn test_balance_failure_skips_cycle_without_crashing() {
        struct FailingBalances;

        #[async_trait]
        impl BalanceProvider for FailingBalances {
            async fn get_balances(&self, _wallet_id: &str) -> PortResult<Vec<TokenBalance>> {
                Err(warden_ports::PortError::Unavailable(
                    "rpc offline".to_string(),
                ))
            }
        }

        let ledger = Arc::new(Mutex::new(PositionLedger::new(
            "wallet-1",
            LedgerConfig::default(),
        )));
        let monitor = MonitoringLoop::new(
            MonitorConfig {
                check_interval: Duration::from_millis(10),
                alert_capacity: 16,
            },
            ledger.clone(),
            Arc::new(FailingBalances),
            RiskEngine::default(),
            None,
        );

        monitor.start().await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(monitor.is_running().await);
        assert!(ledger.lock().await.is_empty());
        monitor.stop().await;
    }
}

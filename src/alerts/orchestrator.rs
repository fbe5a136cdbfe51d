//! Refresh orchestrator: owns the alert state machine
//! `Idle → Loading → {Ready, Error}` and the session's dismissal ledger.
//!
//! Every trigger (scope change, refresh counter change, retry) bumps a
//! generation counter and replaces the pending fetch task. A fetch result
//! is applied only if its generation is still the latest, so a slow
//! response for an old scope can never overwrite a newer one.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;

use super::{compute_alerts, overflow_label, visible_window, Alert, DismissalLedger, Scope};
use crate::config::AlertConfig;
use crate::error::AppError;

/// Source of per-month budget snapshots. Snapshots are handed over as raw
/// JSON; validation happens in the synthesizer.
#[async_trait]
pub trait BudgetStore: Send + Sync {
    async fn fetch_budget_snapshots(&self, year: i32, month: u32) -> Result<Vec<Value>, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshState {
    Idle,
    Loading,
    Ready,
    Error,
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertView {
    pub alerts: Vec<Alert>,
    pub overflow_count: usize,
    pub state: RefreshState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AlertView {
    pub fn overflow_label(&self) -> Option<String> {
        overflow_label(self.overflow_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Scope,
    Refresh,
    Retry,
}

struct EngineState {
    scope: Option<Scope>,
    refresh_token: u64,
    state: RefreshState,
    error_message: Option<String>,
    /// Every alert for the scope, ranked, before dismissal filtering.
    ranked: Vec<Alert>,
    ledger: DismissalLedger,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

/// Handle to the alert engine. Clones share the same state.
///
/// Triggering operations spawn onto the current Tokio runtime and must be
/// called from within one.
#[derive(Clone)]
pub struct AlertEngine {
    store: Arc<dyn BudgetStore>,
    config: AlertConfig,
    inner: Arc<Mutex<EngineState>>,
}

impl AlertEngine {
    pub fn new(store: Arc<dyn BudgetStore>, config: AlertConfig) -> Self {
        Self {
            store,
            config,
            inner: Arc::new(Mutex::new(EngineState {
                scope: None,
                refresh_token: 0,
                state: RefreshState::Idle,
                error_message: None,
                ranked: Vec::new(),
                ledger: DismissalLedger::new(),
                generation: 0,
                pending: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn scope(&self) -> Option<Scope> {
        self.lock().scope
    }

    pub fn state(&self) -> RefreshState {
        self.lock().state
    }

    pub fn refresh_token(&self) -> u64 {
        self.lock().refresh_token
    }

    /// Ranked, non-dismissed alerts capped to `max_visible`. Nothing is
    /// shown in the Error state. While Loading after a plain refresh the
    /// previous alerts stay on screen; a scope change clears them.
    pub fn visible_alerts(&self) -> AlertView {
        let st = self.lock();
        if st.state == RefreshState::Error {
            return AlertView {
                alerts: Vec::new(),
                overflow_count: 0,
                state: st.state,
                error_message: st.error_message.clone(),
            };
        }

        let window = visible_window(&st.ranked, &st.ledger, self.config.max_visible);
        AlertView {
            alerts: window.visible,
            overflow_count: window.overflow_count,
            state: st.state,
            error_message: None,
        }
    }

    /// Dismisses a currently displayed alert at its current severity.
    /// Unknown or hidden ids are ignored.
    pub fn dismiss(&self, alert_id: &str) -> bool {
        let mut st = self.lock();
        if st.state == RefreshState::Error {
            tracing::debug!(alert_id, "Ignoring dismiss while in error state");
            return false;
        }

        let shown = visible_window(&st.ranked, &st.ledger, self.config.max_visible);
        let Some(severity) = shown.visible.iter().find(|a| a.id == alert_id).map(|a| a.severity) else {
            tracing::debug!(alert_id, "Ignoring dismiss of alert that is not displayed");
            return false;
        };

        st.ledger.dismiss(alert_id, severity);
        tracing::info!(alert_id, %severity, "Alert dismissed");
        true
    }

    /// Moves the engine to a new (year, month). Returns `Ok(false)` when the
    /// scope is unchanged. A new scope clears the dismissal ledger before
    /// anything for it is fetched.
    pub fn set_scope(&self, year: i32, month: u32) -> Result<bool, AppError> {
        let scope = Scope::new(year, month)?;
        let mut st = self.lock();
        if st.scope == Some(scope) {
            return Ok(false);
        }

        st.ledger.reset_for_scope();
        st.ranked.clear();
        st.scope = Some(scope);
        tracing::info!(%scope, "Alert scope changed");
        self.schedule(&mut st, Trigger::Scope, self.config.debounce);
        Ok(true)
    }

    /// Bumps the refresh counter, e.g. after an expense was edited.
    pub fn trigger_refresh(&self) {
        let mut st = self.lock();
        st.refresh_token = st.refresh_token.wrapping_add(1);
        self.schedule(&mut st, Trigger::Refresh, self.config.debounce);
    }

    /// Mirrors an externally owned refresh counter; any change of value
    /// triggers, repeating the same value does not.
    pub fn set_refresh_token(&self, token: u64) -> bool {
        let mut st = self.lock();
        if st.refresh_token == token {
            return false;
        }
        st.refresh_token = token;
        self.schedule(&mut st, Trigger::Refresh, self.config.debounce);
        true
    }

    /// Re-fetches the last scope right away. Only valid from Error.
    pub fn retry(&self) -> bool {
        let mut st = self.lock();
        if st.state != RefreshState::Error {
            return false;
        }
        self.schedule(&mut st, Trigger::Retry, Duration::ZERO);
        true
    }

    fn schedule(&self, st: &mut EngineState, trigger: Trigger, delay: Duration) {
        let Some(scope) = st.scope else {
            tracing::debug!(?trigger, "No scope selected yet, nothing to fetch");
            return;
        };

        st.generation += 1;
        let generation = st.generation;
        st.state = RefreshState::Loading;
        st.error_message = None;

        if let Some(prev) = st.pending.take() {
            prev.abort();
            tracing::debug!(?trigger, generation, "Superseded pending alert fetch");
        }

        let store = Arc::clone(&self.store);
        let inner = Arc::clone(&self.inner);
        st.pending = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let result = store.fetch_budget_snapshots(scope.year, scope.month).await;
            apply_fetch(&inner, generation, scope, result);
        }));
    }
}

fn apply_fetch(
    inner: &Mutex<EngineState>,
    generation: u64,
    scope: Scope,
    result: Result<Vec<Value>, AppError>,
) {
    let mut st = inner.lock().unwrap_or_else(|e| e.into_inner());
    if st.generation != generation {
        tracing::debug!(%scope, generation, latest = st.generation, "Discarding stale snapshot response");
        return;
    }
    st.pending = None;

    match result {
        Ok(snapshots) => {
            let ranked = compute_alerts(&snapshots);
            tracing::info!(%scope, snapshots = snapshots.len(), alerts = ranked.len(), "Budget alerts ready");
            st.ranked = ranked;
            st.state = RefreshState::Ready;
            st.error_message = None;
        }
        Err(e) => {
            tracing::warn!(%scope, "Budget snapshot fetch failed: {}", e);
            st.ranked.clear();
            st.state = RefreshState::Error;
            st.error_message = Some(e.to_string());
        }
    }
}

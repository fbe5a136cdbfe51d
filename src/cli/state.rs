// src/cli/state.rs
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::widgets::ListState;

use crate::alerts::{AlertEngine, AlertView, RefreshState, Scope};

pub struct App {
    pub engine: AlertEngine,
    pub scope: Scope,
    pub sel: ListState,
    pub show_help: bool,
    pub status: String,
    pub quit: bool,
}

impl App {
    pub fn new(engine: AlertEngine, scope: Scope) -> Self {
        Self {
            engine,
            scope,
            sel: ListState::default(),
            show_help: false,
            status: "←/→ month | r refresh | d dismiss | ? help | q quit".into(),
            quit: false,
        }
    }

    /// Hands the initial scope to the engine, which kicks off the first fetch.
    pub fn start(&mut self) -> anyhow::Result<()> {
        self.engine.set_scope(self.scope.year, self.scope.month)?;
        Ok(())
    }

    pub fn view(&self) -> AlertView {
        self.engine.visible_alerts()
    }

    pub fn handle_key(&mut self, k: KeyEvent) -> anyhow::Result<()> {
        if k.kind != KeyEventKind::Press {
            return Ok(());
        }

        if self.show_help {
            if matches!(k.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('b')) {
                self.show_help = false;
            }
            return Ok(());
        }

        match k.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Left => self.change_scope(self.scope.prev())?,
            KeyCode::Right => self.change_scope(self.scope.next())?,
            KeyCode::Char('t') => self.change_scope(Scope::current())?,
            KeyCode::Char('r') => {
                self.engine.trigger_refresh();
                self.status = "Refreshing…".into();
            }
            KeyCode::Char('e') => {
                self.status = if self.engine.retry() {
                    "Retrying…".into()
                } else {
                    "Nothing to retry".into()
                };
            }
            KeyCode::Up => self.move_sel(-1),
            KeyCode::Down => self.move_sel(1),
            KeyCode::Char('d') | KeyCode::Delete => self.dismiss_selected(),
            _ => {}
        }
        Ok(())
    }

    fn change_scope(&mut self, scope: Scope) -> anyhow::Result<()> {
        if self.engine.set_scope(scope.year, scope.month)? {
            self.scope = scope;
            self.sel.select(None);
            self.status = format!("Showing {scope}");
        }
        Ok(())
    }

    fn move_sel(&mut self, delta: isize) {
        let n = self.view().alerts.len();
        if n == 0 {
            self.sel.select(None);
            return;
        }
        let cur = self.sel.selected().unwrap_or(0) as isize;
        let next = (cur + delta).rem_euclid(n as isize) as usize;
        self.sel.select(Some(next));
    }

    fn dismiss_selected(&mut self) {
        let view = self.view();
        if view.state == RefreshState::Error {
            self.status = "Cannot dismiss while alerts are unavailable".into();
            return;
        }
        let Some(alert) = self.sel.selected().and_then(|i| view.alerts.get(i)) else {
            self.status = "Select an alert first".into();
            return;
        };

        if self.engine.dismiss(&alert.id) {
            self.status = format!("Dismissed {} alert", alert.category);
        }
        self.clamp_selection();
    }

    /// Keeps the highlighted row inside the current list.
    pub fn clamp_selection(&mut self) {
        let len = self.view().alerts.len();
        match (len, self.sel.selected()) {
            (0, _) => self.sel.select(None),
            (n, Some(i)) if i >= n => self.sel.select(Some(n - 1)),
            (_, None) => self.sel.select(Some(0)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::BudgetStore;
    use crate::config::AlertConfig;
    use crate::error::AppError;
    use async_trait::async_trait;
    use crossterm::event::KeyModifiers;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    struct FixedStore;

    #[async_trait]
    impl BudgetStore for FixedStore {
        async fn fetch_budget_snapshots(&self, _year: i32, month: u32) -> Result<Vec<Value>, AppError> {
            Ok(vec![
                json!({"id": month, "category": "Food", "limit": 100, "spent": 120}),
                json!({"id": 100 + month, "category": "Gas", "limit": 100, "spent": 85}),
            ])
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let engine = AlertEngine::new(Arc::new(FixedStore), AlertConfig::default());
        App::new(engine, Scope::new(2026, 10).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn arrow_keys_move_the_scope() {
        let mut app = app();
        app.start().unwrap();
        app.handle_key(press(KeyCode::Right)).unwrap();
        assert_eq!(app.scope, Scope::new(2026, 11).unwrap());
        assert_eq!(app.engine.scope(), Some(app.scope));
        app.handle_key(press(KeyCode::Left)).unwrap();
        app.handle_key(press(KeyCode::Left)).unwrap();
        assert_eq!(app.scope, Scope::new(2026, 9).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_removes_selected_alert() {
        let mut app = app();
        app.start().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(app.view().alerts.len(), 2);

        app.clamp_selection();
        app.handle_key(press(KeyCode::Char('d'))).unwrap();
        let view = app.view();
        assert_eq!(view.alerts.len(), 1);
        assert_eq!(view.alerts[0].category, "Gas");
        assert_eq!(app.sel.selected(), Some(0));
    }

    #[tokio::test]
    async fn help_swallows_keys_until_closed() {
        let mut app = app();
        app.handle_key(press(KeyCode::Char('?'))).unwrap();
        assert!(app.show_help);
        app.handle_key(press(KeyCode::Char('q'))).unwrap();
        assert!(!app.quit);
        app.handle_key(press(KeyCode::Esc)).unwrap();
        app.handle_key(press(KeyCode::Char('q'))).unwrap();
        assert!(app.quit);
    }
}

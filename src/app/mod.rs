//! Session controller: one-shot dispatch and the interactive loop
//!
//! The controller resolves the filter query once, short-circuits the
//! one-shot modes (--token / --export), and otherwise runs the menu loop:
//! one keystroke read, one action dispatched, cancellation checked before
//! each read and after each dispatch.

pub mod state;

pub use state::SessionState;

use anyhow::Result;
use tracing::info;

use crate::export::{ExportOutcome, Exporter};
use crate::input::{CancelFlag, InputSource, Key};
use crate::models::FilterCriteria;
use crate::storage::RecordStore;
use crate::ui;

/// How the interactive loop terminated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionEnd {
    /// Operator pressed q
    Quit,
    /// Cancellation flag observed at a safe point
    Interrupted,
}

pub struct Session<'a> {
    store: &'a RecordStore,
    exporter: Exporter<'a>,
    state: SessionState,
    cancel: CancelFlag,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a RecordStore, exporter: Exporter<'a>, cancel: CancelFlag) -> Self {
        Session {
            store,
            exporter,
            state: SessionState::new(),
            cancel,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Resolve the active record set and dispatch. Precedence: token+export,
    /// then token, then export-all, then the interactive loop.
    pub fn run(
        &mut self,
        criteria: &FilterCriteria,
        token: Option<&str>,
        export: bool,
        input: &mut dyn InputSource,
    ) -> Result<()> {
        self.state.records = self.store.list(criteria)?;
        info!(records = self.state.records.len(), "active record set resolved");

        match (token, export) {
            (Some(token), true) => self.export_token(token),
            (Some(token), false) => self.show_detail(token),
            (None, true) => self.export_active_set(),
            (None, false) => {
                ui::clear_screen();
                self.show_listing();
                self.run_interactive(input).map(|_| ())
            }
        }
    }

    /// The menu loop. Reads one key per iteration; the cancellation flag is
    /// checked before blocking on input and again after each dispatch, so an
    /// interrupt is never left pending for more than one iteration.
    pub fn run_interactive(&mut self, input: &mut dyn InputSource) -> Result<SessionEnd> {
        ui::print_menu(self.state.current_token());

        loop {
            if self.cancel.is_triggered() {
                return Ok(self.interrupted());
            }

            let key = input.read_key()?;
            if let Some(end) = self.dispatch(key, input)? {
                return Ok(end);
            }

            if self.cancel.is_triggered() {
                return Ok(self.interrupted());
            }
        }
    }

    fn dispatch(&mut self, key: Key, input: &mut dyn InputSource) -> Result<Option<SessionEnd>> {
        match key {
            Key::Char('m') => {
                ui::clear_screen();
                self.show_listing();
                ui::print_menu(self.state.current_token());
            }
            Key::Char('q') => {
                ui::success("Exiting program.");
                return Ok(Some(SessionEnd::Quit));
            }
            Key::Char('d') => {
                let line =
                    input.read_line("Please enter the token code you want to display:")?;
                if self.cancel.is_triggered() {
                    return Ok(None);
                }
                let token = line.trim();
                if !token.is_empty() {
                    // Selected even when the lookup fails, so a typo can be
                    // retried and the export option stays on the menu.
                    self.state.select(token);
                    self.show_detail(token)?;
                }
                ui::print_menu(self.state.current_token());
            }
            Key::Char('e') => {
                if let Some(token) = self.state.current_token().map(str::to_string) {
                    self.export_token(&token)?;
                }
            }
            Key::Char(_) | Key::Interrupt | Key::Other => {}
        }
        Ok(None)
    }

    fn interrupted(&self) -> SessionEnd {
        ui::success("Exiting program (CTRL+C).");
        SessionEnd::Interrupted
    }

    fn show_listing(&mut self) {
        self.state.clear_selection();
        ui::print_records_table(&self.state.records);
    }

    fn show_detail(&self, token: &str) -> Result<()> {
        match ui::present(self.store, token)? {
            Some(view) => ui::print_detail(&view),
            None => ui::error(&format!("No profile found for token: {token}")),
        }
        Ok(())
    }

    fn export_token(&self, token: &str) -> Result<()> {
        match self.exporter.export_one(token)? {
            ExportOutcome::Written(filename) => {
                ui::success(&format!("Curl command exported to file: {filename}"));
            }
            ExportOutcome::NotFound => {
                ui::error(&format!("No profile found for token: {token}"));
            }
        }
        Ok(())
    }

    /// Batch export over the active set. Individual NotFound outcomes are
    /// reported but the aggregate success line prints regardless.
    fn export_active_set(&self) -> Result<()> {
        let outcomes = self.exporter.export_all(&self.state.records)?;
        for (token, outcome) in &outcomes {
            match outcome {
                ExportOutcome::Written(filename) => {
                    ui::success(&format!("Curl command exported to file: {filename}"));
                }
                ExportOutcome::NotFound => {
                    ui::error(&format!("No profile found for token: {token}"));
                }
            }
        }
        ui::success("All tokens have been exported.");
        Ok(())
    }
}

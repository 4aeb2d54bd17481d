//! Raw keyboard input with scoped terminal mode and cooperative cancellation

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Cancellation flag shared between the input layer and the session loop.
/// Tripped by an interrupt, checked at the loop's safe points.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Raw mode for the lifetime of one read; cooked mode is restored on every
/// exit path, including errors.
struct RawModeGuard;

impl RawModeGuard {
    fn acquire() -> Result<Self> {
        enable_raw_mode()?;
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// One keystroke worth of session input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Key {
    Char(char),
    /// Ctrl+C observed during a read
    Interrupt,
    Other,
}

/// Blocking input as seen by the session loop. Implemented by the real
/// terminal and by scripted sources in tests.
pub trait InputSource {
    /// Block until one keystroke is available.
    fn read_key(&mut self) -> Result<Key>;

    /// Blocking line read used by the token prompt. Returns the submitted
    /// line, or an empty string when the prompt is abandoned.
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Keyboard input from the controlling terminal.
pub struct TerminalInput {
    cancel: CancelFlag,
}

impl TerminalInput {
    pub fn new(cancel: CancelFlag) -> Self {
        TerminalInput { cancel }
    }
}

impl InputSource for TerminalInput {
    fn read_key(&mut self) -> Result<Key> {
        let _guard = RawModeGuard::acquire()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    self.cancel.trigger();
                    return Ok(Key::Interrupt);
                }
                return Ok(match key.code {
                    KeyCode::Char(c) => Key::Char(c),
                    _ => Key::Other,
                });
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt} ");
        io::stdout().flush()?;

        let _guard = RawModeGuard::acquire()?;
        let mut line = String::new();
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                self.cancel.trigger();
                line.clear();
                break;
            }
            match key.code {
                KeyCode::Enter => break,
                KeyCode::Esc => {
                    line.clear();
                    break;
                }
                KeyCode::Backspace => {
                    if line.pop().is_some() {
                        print!("\x08 \x08");
                        io::stdout().flush()?;
                    }
                }
                KeyCode::Char(c) => {
                    line.push(c);
                    print!("{c}");
                    io::stdout().flush()?;
                }
                _ => {}
            }
        }
        print!("\r\n");
        io::stdout().flush()?;
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag_starts_clear() {
        assert!(!CancelFlag::new().is_triggered());
    }

    #[test]
    fn test_cancel_flag_is_shared_between_clones() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        clone.trigger();
        assert!(flag.is_triggered());
    }
}

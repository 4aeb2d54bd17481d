//! Session state - pure data with no I/O logic

use crate::models::RecordSummary;

/// State owned by the session controller: the active record set from the
/// last filter query, and the most recently detail-viewed token. The
/// selection gates the export-current action and is cleared whenever the
/// list is redisplayed.
#[derive(Debug, Default)]
pub struct SessionState {
    pub records: Vec<RecordSummary>,
    pub current_token: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, token: impl Into<String>) {
        self.current_token = Some(token.into());
    }

    pub fn clear_selection(&mut self) {
        self.current_token = None;
    }

    pub fn current_token(&self) -> Option<&str> {
        self.current_token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_starts_empty() {
        assert_eq!(SessionState::new().current_token(), None);
    }

    #[test]
    fn test_select_then_clear() {
        let mut state = SessionState::new();
        state.select("abc123");
        assert_eq!(state.current_token(), Some("abc123"));
        state.clear_selection();
        assert_eq!(state.current_token(), None);
    }
}

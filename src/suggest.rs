//! Debounced location autocomplete
//!
//! Every keystroke bumps a generation counter. A lookup only fires if no
//! newer keystroke arrived during the quiet period, and its result is only
//! handed back if still no newer keystroke arrived while it was in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::error::ProviderError;
use crate::models::Suggestion;
use crate::provider::WeatherProvider;

/// What the caller should do with its suggestion list
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome {
    /// Input too short: clear the list. No request was made.
    Cleared,
    /// A newer keystroke arrived before the quiet period ended. No request was made.
    Superseded,
    /// A newer keystroke arrived while the request was in flight; drop the result
    Stale,
    /// Show these (an empty list means "No results found")
    Ready(Vec<Suggestion>),
    /// The lookup failed; keep whatever is currently shown
    Failed(ProviderError),
}

/// Autocomplete state for one search box
pub struct SuggestionBox {
    provider: Arc<dyn WeatherProvider>,
    generation: AtomicU64,
    quiet_period: Duration,
    min_chars: usize,
}

impl SuggestionBox {
    pub fn new(provider: Arc<dyn WeatherProvider>, quiet_period: Duration, min_chars: usize) -> Self {
        Self {
            provider,
            generation: AtomicU64::new(0),
            quiet_period,
            min_chars,
        }
    }

    pub fn from_config(provider: Arc<dyn WeatherProvider>, config: &SearchConfig) -> Self {
        Self::new(provider, config.debounce(), config.min_query_chars)
    }

    /// Handle the search box's new contents
    pub async fn input(&self, text: &str) -> SuggestionOutcome {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let text = text.trim();

        if text.chars().count() < self.min_chars {
            return SuggestionOutcome::Cleared;
        }

        tokio::time::sleep(self.quiet_period).await;
        if !self.is_current(ticket) {
            debug!("Suggestion lookup for '{}' superseded before firing", text);
            return SuggestionOutcome::Superseded;
        }

        let result = self.provider.search(text).await;
        if !self.is_current(ticket) {
            debug!("Discarding stale suggestions for '{}'", text);
            return SuggestionOutcome::Stale;
        }

        match result {
            Ok(suggestions) => SuggestionOutcome::Ready(suggestions),
            Err(e) => {
                warn!("Search error for '{}': {}", text, e);
                SuggestionOutcome::Failed(e)
            }
        }
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }
}

/// One-shot lookup without debouncing, for callers that debounce themselves
pub async fn lookup(
    provider: &dyn WeatherProvider,
    text: &str,
    min_chars: usize,
) -> Result<Vec<Suggestion>, ProviderError> {
    let text = text.trim();
    if text.chars().count() < min_chars {
        return Ok(Vec::new());
    }
    provider.search(text).await
}

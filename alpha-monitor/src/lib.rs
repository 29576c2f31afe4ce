//! # Alpha Monitor
//! Polling, retention and view derivation core for a dashboard over the Binance Alpha token pool.
//!
//! * **Poll**: a [`Poller`] fetches the token list from a [`TokenSource`] at startup, on a
//!   reschedulable timer and on demand, drops tokens that graduated to a CEX listing, and
//!   publishes the rest into [`SharedState`].
//! * **Retain**: every successful poll appends one observation per token to the
//!   [`HistoryStore`], evicting points older than the retention window.
//! * **Derive**: [`derive_view`] filters and sorts the current token set for presentation, and
//!   [`reduce`] applies user intents to a [`ViewState`].
//!
//! ## Example
//! ```rust,no_run
//! use alpha_monitor::{AlphaClient, MonitorConfig, MonitorState, Poller, derive_view};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MonitorConfig::from_env()?;
//!     let state = MonitorState::with_retention(config.retention).shared();
//!
//!     let poller = Poller::new(AlphaClient::new(&config)?, state.clone());
//!     let summary = poller.poll_once().await?;
//!     println!("published {} tokens", summary.published);
//!
//!     let state = state.read();
//!     let view = alpha_monitor::ViewState::default();
//!     for token in derive_view(state.tokens(), &view.search, view.sort_field, view.sort_direction) {
//!         println!("{} {}", token.symbol(), token.price);
//!     }
//!
//!     Ok(())
//! }
//! ```

/// Token list HTTP client and the [`TokenSource`] abstraction.
pub mod client;

/// Environment driven [`MonitorConfig`].
pub mod config;

/// Parse-with-default helpers for string encoded API fields.
pub mod de;

/// All errors generated in `alpha-monitor`.
pub mod error;

/// Per-token time series with time based eviction.
pub mod history;

/// Poll loop, refresh schedule and the [`PollerHandle`] used to control them.
pub mod poller;

/// Current token set and poll status shared between the poller and its readers.
pub mod state;

/// Raw and normalised token records.
pub mod token;

/// Sort, filter and column state of the dashboard, with its pure reducer.
pub mod view;

pub use client::{AlphaClient, TokenSource};
pub use config::{MonitorConfig, REFRESH_INTERVAL_PRESETS};
pub use error::{ErrorKind, MonitorError};
pub use history::{HistoryMetric, HistoryPoint, HistorySeries, HistoryStore, MetricPoint};
pub use poller::{Poller, PollerCommand, PollerHandle, RefreshSchedule};
pub use state::{MonitorState, PollStatus, PollSummary, SharedState};
pub use token::{EnrichedToken, RawTokenRecord, TokenId, normalize};
pub use view::{
    Column, SortDirection, SortField, Transition, ViewIntent, ViewState, derive_view, reduce,
};

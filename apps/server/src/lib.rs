//! HTTP gateway for Vietnamese and international market data.
//!
//! A thin translation layer: every route parses its query parameters,
//! invokes exactly one accessor call from `vnquant-market-data`, runs the
//! result through the normalizer and serializes it. All state lives in
//! [`state::AppState`]; requests share nothing mutable.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use state::{build_state, init_tracing, AppState};

//! Common test utilities and logging infrastructure
//!
//! Integration tests share one logging setup. The library logs through the
//! `log` facade; `tracing-subscriber` bridges those records so they show up
//! next to the tests' own `tracing` events.
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::init_test_logging;
//!
//! #[test]
//! fn my_test() {
//!     init_test_logging();
//!     // test code...
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG=debug` - Enable debug logging in tests
//! - `RUST_LOG=folio_table::layout=trace` - Module-specific tracing
//! - `TEST_LOG_JSON=1` - Output JSON format for CI parsing

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Initialize test logging infrastructure.
///
/// Output goes through the test writer, so it is captured by `cargo test`
/// unless `--nocapture` is given. Calling it more than once is safe.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let use_json = std::env::var("TEST_LOG_JSON").is_ok();

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("folio_table=debug,test=info"));

        if use_json {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_test_writer())
                .try_init()
                .ok();
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_test_writer()
                        .with_ansi(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_target(true)
                        .compact(),
                )
                .try_init()
                .ok();
        }
    });
}

/// A test span guard that logs entry and exit.
pub struct TestPhase {
    name: &'static str,
}

impl TestPhase {
    pub fn new(name: &'static str) -> Self {
        tracing::info!(phase = name, "entering test phase");
        Self { name }
    }
}

impl Drop for TestPhase {
    fn drop(&mut self) {
        tracing::info!(phase = self.name, "leaving test phase");
    }
}

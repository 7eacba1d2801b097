//! groovesmith end-to-end test infrastructure
//!
//! This crate holds the cross-crate tests:
//!
//! - Scenarios: request -> composed artifact -> rendered audio / MIDI
//! - Determinism: same request and seed give byte-identical output
//! - Properties: pattern shape, melody invariants, mixing peak bound
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p groovesmith-tests
//!
//! # With generator logging
//! RUST_LOG=groovesmith_backend_music=debug cargo test -p groovesmith-tests
//! ```

pub mod audio_analysis;
pub mod determinism;
pub mod fixtures;

use std::sync::Once;

pub use determinism::{verify_determinism, DeterminismResult, DiffInfo};

static TRACING: Once = Once::new();

/// Installs a test subscriber once per process; `RUST_LOG` controls output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

//! Weft command-line driver.
//!
//! The `weft` binary is a thin argument parser over [`commands`]; the
//! pieces live in this library so integration tests can drive them without
//! spawning a process.

pub mod commands;
pub mod reporting;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the CLI's tracing subscriber, once.
///
/// Does nothing unless `WEFT_LOG` is set; its value is an `EnvFilter`
/// directive such as `weft_eval=debug`. Output is a hierarchical span tree
/// on stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let Ok(directives) = std::env::var("WEFT_LOG") else {
            return;
        };
        let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
            eprintln!("warning: ignoring invalid WEFT_LOG `{directives}`: {e}");
            EnvFilter::new("warn")
        });
        let tree = tracing_tree::HierarchicalLayer::new(2)
            .with_targets(true)
            .with_bracketed_fields(true)
            .with_writer(std::io::stderr);
        // A subscriber may already be installed when embedded in a test harness.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tree)
            .try_init();
    });
}

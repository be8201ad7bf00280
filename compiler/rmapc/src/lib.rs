//! rmapc - the register-map compiler driver.
//!
//! Loads declaration files, builds the [`Corpus`](rmap_build::Corpus) and
//! runs one traversal per requested output and root element.
//!
//! # Outputs
//!
//! - `tree`: an indented, human-readable dump of the resolved layout
//! - `explicit`: the declarations again, with every inferred attribute
//!   written out, so the layout can be frozen
//!
//! # Tracing
//!
//! `-v` enables hierarchical span output. Otherwise set `RUST_LOG`, e.g.
//! `RUST_LOG=rmap_build=trace` to see every placement decision.

mod config;
mod driver;
mod input;
pub mod output;

use std::sync::Once;

pub use config::{Config, OutputFormat, USAGE};
pub use driver::{run, DriverError, Report};
pub use input::{load_sources, Source};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing.
///
/// Call this once at startup. Safe to call multiple times. With `verbose`
/// the subscriber prints a span tree at `debug` unless `RUST_LOG` says
/// otherwise; without it, nothing is installed unless `RUST_LOG` is set.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if verbose {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        } else if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

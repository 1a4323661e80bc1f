//! Logging setup for the command-line driver.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Safe to call multiple times.
///
/// `RUST_LOG` wins when set; otherwise the level is `warn`, or `debug`
/// with `verbose`. `DEEPCOPY_LOG_TREE=1` prints nested spans as a tree.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = match std::env::var("RUST_LOG") {
            Ok(_) => EnvFilter::from_default_env(),
            Err(_) if verbose => EnvFilter::new("debug"),
            Err(_) => EnvFilter::new("warn"),
        };

        let tree = std::env::var("DEEPCOPY_LOG_TREE").is_ok_and(|value| value == "1");
        let (tree_layer, fmt_layer) = if tree {
            (
                Some(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                ),
                None,
            )
        } else {
            (
                None,
                Some(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                ),
            )
        };

        tracing_subscriber::registry()
            .with(tree_layer)
            .with(fmt_layer)
            .with(filter)
            .init();
    });
}

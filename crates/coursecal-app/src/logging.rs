use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

/// Handle for swapping the active filter once configuration is loaded.
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Filter used until configuration has been read.
const BOOTSTRAP_FILTER: &str = "info";

/// ## Summary
/// Installs the global subscriber with a reloadable filter.
///
/// Log lines go to stderr so command output on stdout stays clean.
#[must_use]
pub fn init() -> FilterHandle {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new(BOOTSTRAP_FILTER));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    filter_handle
}

/// ## Summary
/// Picks the filter directive for this run.
///
/// `RUST_LOG` wins, then `-v` flags (`-v` debug, `-vv` trace), then the
/// configured `logging.level`.
#[must_use]
pub fn effective_directive(configured: &str, verbosity: u8, rust_log: Option<&str>) -> String {
    if let Some(directive) = rust_log.filter(|value| !value.trim().is_empty()) {
        return directive.to_string();
    }
    match verbosity {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Replaces the bootstrap filter, keeping it when the directive is invalid.
pub fn apply(handle: &FilterHandle, directive: &str) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => {
            if let Err(e) = handle.modify(|current| *current = filter) {
                tracing::warn!(error = %e, "Failed to update log filter");
            }
        }
        Err(e) => {
            tracing::warn!(level = %directive, error = %e, "Invalid log level, keeping {BOOTSTRAP_FILTER}");
        }
    }
}

pub mod build_info;

use std::{
    path::{Path, PathBuf},
    sync::Once,
};

use tracing_subscriber::{fmt, EnvFilter};

pub use envelope_config::default_home_dir as app_home_dir;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "envelope_budget=info";

/// Initializes the global tracing subscriber with sensible defaults.
///
/// Events go to stderr so script-mode stdout stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = match DEFAULT_DIRECTIVE.parse() {
            Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
            Err(_) => EnvFilter::from_default_env(),
        };

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Directory holding the local snapshot cache under `home`.
pub fn cache_dir(home: &Path) -> PathBuf {
    home.join("cache")
}

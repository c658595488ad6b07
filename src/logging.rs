use tracing_subscriber::EnvFilter;

/// Installe le subscriber global. `RUST_LOG` prime sur le niveau par défaut.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Un second appel (tests) ne doit pas paniquer
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

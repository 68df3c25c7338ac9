use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Output goes to stderr so it never mixes
/// with the transcript on stdout.
pub fn init(verbose: bool) {
    let default_level = if verbose { "glowchat=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("GLOWCHAT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

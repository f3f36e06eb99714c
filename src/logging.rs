use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn env_filter(default_filter: &str, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("pokedex_explorer=debug,info");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Log to a file. Used by the TUI, which owns the terminal.
pub fn init_file(path: &Path, default_filter: &str, verbose: bool) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter, verbose))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Log to stderr, for the one-shot subcommands.
pub fn init_stderr(default_filter: &str, verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use svgsplit::cli::{get_config, run};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = get_config().and_then(run) {
        eprintln!("svgsplit: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

use std::io;

use cli::{parse_args, run};
use color_eyre::eyre::Result;
use tracing_subscriber::{self, EnvFilter};

fn main() -> Result<()> {
    color_eyre::install()?;

    // stdout carries the reports, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn"))
        )
        .with_writer(io::stderr)
        .init();

    let Some(cli) = parse_args(std::env::args_os()) else {
        return Ok(());
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}

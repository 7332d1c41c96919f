use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod display;
mod io;
mod util;

const DEFAULT_LOG_FILTER: &str = "pharmsim=warn";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let cli = cli::parse();
    let ctx = display::Context::new(cli.output.quiet);

    if ctx.interactive {
        display::print_banner();
    }

    match commands::dispatch(cli, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

//! `ctype` binary.
//!
//! Loads an admin configuration (settings, seeded collections and content
//! types) and lets you list its routes or render a path through the configured
//! router backend.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let stdout = std::io::stdout();
	commands::run(cli.command, &mut stdout.lock())
}

fn setup_tracing(verbosity: u8) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("CTYPE_LOG").unwrap_or_else(|_| match verbosity {
		0 => EnvFilter::new("warn"),
		1 => EnvFilter::new("ctype_content=debug,ctype_router=debug,ctype_store=debug,info"),
		_ => EnvFilter::new("trace"),
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ctype_primitives::{DisplayName, EndpointKey};

#[derive(Parser, Debug)]
#[command(name = "ctype")]
#[command(about = "Inspect and render content-type admins described in TOML")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Raise log verbosity (-v debug, -vv trace); CTYPE_LOG overrides
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// List every endpoint route with its backend and enabled state
	Routes {
		/// Admin configuration file
		config: PathBuf,
	},
	/// Print the effective settings
	Settings {
		/// Admin configuration file
		config: PathBuf,
	},
	/// Enter a path and print the rendered page
	Render {
		/// Admin configuration file
		config: PathBuf,

		/// Path to enter, e.g. /admin/content/article/index
		path: String,

		/// Active display for an endpoint, as [<ctid>.]<endpoint>=<display>;
		/// without a ctid it applies to every content type with that endpoint
		#[arg(long = "display", value_name = "[CTID.]ENDPOINT=DISPLAY", value_parser = parse_display)]
		displays: Vec<DisplayArg>,
	},
}

/// Display selection given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayArg {
	pub ctid: Option<String>,
	pub key: EndpointKey,
	pub display: DisplayName,
}

pub fn parse_display(input: &str) -> Result<DisplayArg, String> {
	let (target, display) = input
		.split_once('=')
		.ok_or_else(|| format!("expected [<ctid>.]<endpoint>=<display>, got {input:?}"))?;
	let (ctid, key) = match target.split_once('.') {
		Some((ctid, key)) => (Some(ctid.to_string()), key),
		None => (None, target),
	};
	Ok(DisplayArg {
		ctid,
		key: EndpointKey::new(key).map_err(|e| e.to_string())?,
		display: DisplayName::new(display).map_err(|e| e.to_string())?,
	})
}

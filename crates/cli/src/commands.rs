use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use ctype_config::Settings;
use ctype_content::{ContentTypes, Page};
use tracing::{debug, info};

use crate::cli::{Command, DisplayArg};

pub fn run(command: Command, out: &mut impl Write) -> anyhow::Result<()> {
	match command {
		Command::Routes { config } => routes(&load(&config)?, out),
		Command::Settings { config } => settings(load(&config)?.settings(), out),
		Command::Render {
			config,
			path,
			displays,
		} => render(&load(&config)?, &path, &displays, out),
	}
}

fn load(path: &Path) -> anyhow::Result<ContentTypes> {
	let config = ctype_config::load_file(path)?;
	let admin = ContentTypes::from_config(&config)
		.with_context(|| format!("building content types from {}", path.display()))?;
	info!(
		config = %path.display(),
		content_types = admin.content_types().len(),
		backend = %admin.backend().kind(),
		"admin loaded"
	);
	Ok(admin)
}

fn routes(admin: &ContentTypes, out: &mut impl Write) -> anyhow::Result<()> {
	let backend = admin.backend().kind();
	for ct in admin.content_types() {
		for descriptor in ct.descriptors().values() {
			writeln!(
				out,
				"{}\t{}\t{}\t{}",
				descriptor.name, descriptor.path, backend, descriptor.enabled
			)?;
		}
	}
	Ok(())
}

fn settings(settings: &Settings, out: &mut impl Write) -> anyhow::Result<()> {
	for key in Settings::KEYS {
		if let Some(value) = settings.get_setting(key) {
			writeln!(out, "{key} = {value}")?;
		}
	}
	Ok(())
}

fn render(
	admin: &ContentTypes,
	path: &str,
	displays: &[DisplayArg],
	out: &mut impl Write,
) -> anyhow::Result<()> {
	for arg in displays {
		let targets = match &arg.ctid {
			Some(ctid) => match admin.get(ctid) {
				Some(ct) => vec![ct],
				None => bail!("no content type {ctid:?}"),
			},
			None => admin
				.content_types()
				.into_iter()
				.filter(|ct| ct.route(&arg.key).is_some())
				.collect(),
		};
		if targets.is_empty() {
			bail!("no content type has an enabled {} endpoint", arg.key);
		}
		for ct in targets {
			ct.set_display(&arg.key, arg.display.clone())
				.with_context(|| format!("selecting display for {}.{}", ct.ctid(), arg.key))?;
			debug!(ctid = %ct.ctid(), endpoint = %arg.key, display = %arg.display, "display preset");
		}
	}

	match admin.enter(path)? {
		Page::Rendered {
			route,
			layout,
			pass,
		} => {
			debug!(route = %route, view = %pass.view, "rendered");
			if let Some(layout) = layout {
				writeln!(out, "[{layout}]")?;
			}
			write!(out, "{}", pass.body)?;
		}
		Page::Redirect { route, to } => {
			writeln!(out, "{route} redirects to {to}")?;
		}
	}
	Ok(())
}

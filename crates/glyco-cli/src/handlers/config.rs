//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use std::path::PathBuf;
use tracing::info;

/// Handle the config command
pub async fn handle_config(
    args: ConfigArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Paths => handle_config_paths(output),
    }
}

/// Handle config show subcommand
fn handle_config_show(
    args: ConfigShowArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let content = render(config, args.format)?;
    output.writeln(content.trim_end())
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => Config::user_config_path()
            .ok_or_else(|| Error::config("Unable to determine user config directory"))?,
    };

    if path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ))?;
        return Ok(());
    }

    Config::default().save(&path)?;

    info!(path = %path.display(), "Wrote default configuration");
    output.success(&format!("✓ Created config at {}", path.display()))
}

/// Handle config paths subcommand
fn handle_config_paths(output: &mut OutputWriter) -> Result<()> {
    let paths = Config::default_config_paths();

    if output.format() != crate::cli::OutputFormat::Human {
        let listing: Vec<PathListing> = paths.into_iter().map(PathListing::new).collect();
        return output.data(&listing);
    }

    for path in paths {
        let marker = if path.exists() { "✓" } else { " " };
        output.writeln(&format!("{} {}", marker, path.display()))?;
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct PathListing {
    path: PathBuf,
    exists: bool,
}

impl PathListing {
    fn new(path: PathBuf) -> Self {
        let exists = path.exists();
        Self { path, exists }
    }
}

fn render(config: &Config, format: ConfigFormat) -> Result<String> {
    let content = match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyco_structure::Origin;

    #[test]
    fn test_render_every_format() {
        let mut config = Config::default();
        config.ingestion.origin = Origin::Internal;

        let yaml = render(&config, ConfigFormat::Yaml).unwrap();
        assert!(yaml.contains("origin: internal"));

        let toml = render(&config, ConfigFormat::Toml).unwrap();
        assert!(toml.contains("[ingestion]"));

        let json = render(&config, ConfigFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ingestion"]["origin"], "internal");
    }
}

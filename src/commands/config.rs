use clap::{Args, Subcommand};
use serde::Serialize;

use tidytree::defaults::{self, Defaults, TidyConfig};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display configuration (merged defaults + file)
    Show {
        /// Show only built-in defaults (ignore tidytree.json)
        #[arg(long)]
        builtin: bool,
    },
    /// Write built-in defaults to tidytree.json (fails if it already exists)
    Init,
    /// Reset configuration to built-in defaults (deletes tidytree.json)
    Reset,
    /// Show the path to tidytree.json
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<TidyConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    defaults: Option<Defaults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted: Option<bool>,
}

impl ConfigOutput {
    fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            config: None,
            defaults: None,
            path: None,
            exists: None,
            deleted: None,
        }
    }
}

pub fn run(args: ConfigArgs, global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin } => show(builtin, global),
        ConfigCommand::Init => init(),
        ConfigCommand::Reset => reset(),
        ConfigCommand::Path => path(),
    }
}

fn show(builtin: bool, global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    let mut output = ConfigOutput::new("config.show");
    if builtin {
        output.defaults = Some(defaults::builtin_defaults());
    } else {
        output.config = Some(global.load_config()?);
    }
    Ok((output, 0))
}

fn init() -> CmdResult<ConfigOutput> {
    if defaults::config_exists() {
        return Err(tidytree::Error::validation_invalid_argument(
            "config",
            "tidytree.json already exists",
            Some(defaults::config_path()?),
        ));
    }

    let config = TidyConfig::default();
    defaults::save_config(&config)?;

    let mut output = ConfigOutput::new("config.init");
    output.path = Some(defaults::config_path()?);
    output.config = Some(config);
    Ok((output, 0))
}

fn reset() -> CmdResult<ConfigOutput> {
    let deleted = defaults::reset_config()?;
    let mut output = ConfigOutput::new("config.reset");
    output.path = Some(defaults::config_path()?);
    output.deleted = Some(deleted);
    Ok((output, 0))
}

fn path() -> CmdResult<ConfigOutput> {
    let mut output = ConfigOutput::new("config.path");
    output.path = Some(defaults::config_path()?);
    output.exists = Some(defaults::config_exists());
    Ok((output, 0))
}

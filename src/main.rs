use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;

use commands::{config, normalize, rename};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "tidytree")]
#[command(version = VERSION)]
#[command(about = "Normalize file and directory names across a tree")]
struct Cli {
    /// Config file to use instead of ~/.config/tidytree/tidytree.json
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rename every entry under a directory to its normalized form
    Rename(rename::RenameArgs),
    /// Show the normalized form of one or more names
    Normalize(normalize::NormalizeArgs),
    /// Manage tidytree configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs { config: cli.config };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    // Nothing left to report to if stdout itself fails.
    let _ = output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}

use clap::Args;
use serde::Serialize;

use tidytree::normalize::{Normalizer, StepOutput};

use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct NormalizeArgs {
    /// Names to normalize
    #[arg(required = true)]
    names: Vec<String>,

    /// Include the output of every pipeline step
    #[arg(long)]
    trace: bool,
}

#[derive(Serialize)]
pub struct NormalizeOutput {
    command: String,
    results: Vec<NormalizedName>,
}

#[derive(Serialize)]
pub struct NormalizedName {
    input: String,
    output: String,
    changed: bool,
    empty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<Vec<StepOutput>>,
}

pub fn run(args: NormalizeArgs, global: &GlobalArgs) -> CmdResult<NormalizeOutput> {
    let defaults = global.load_config()?.defaults;
    let normalizer = Normalizer::new(defaults.normalize_options());

    let results = args
        .names
        .into_iter()
        .map(|input| {
            let output = normalizer.normalize(&input);
            NormalizedName {
                changed: output != input,
                empty: output.is_empty(),
                steps: args.trace.then(|| normalizer.trace(&input)),
                output,
                input,
            }
        })
        .collect();

    Ok((
        NormalizeOutput {
            command: "normalize".to_string(),
            results,
        },
        0,
    ))
}

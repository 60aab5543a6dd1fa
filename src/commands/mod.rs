pub type CmdResult<T> = tidytree::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Explicit config file (overrides ~/.config/tidytree/tidytree.json)
    pub config: Option<String>,
}

impl GlobalArgs {
    /// Config file selected by `--config`, or the global one.
    pub fn load_config(&self) -> tidytree::Result<tidytree::defaults::TidyConfig> {
        match &self.config {
            Some(path) => {
                let expanded = shellexpand::tilde(path);
                tidytree::defaults::load_config_from(std::path::Path::new(expanded.as_ref()))
            }
            None => tidytree::defaults::load_config(),
        }
    }
}

pub mod config;
pub mod normalize;
pub mod rename;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (tidytree::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Rename(args) => dispatch!(args, global, rename),
        crate::Commands::Normalize(args) => dispatch!(args, global, normalize),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}

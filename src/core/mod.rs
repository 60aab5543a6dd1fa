// Public modules
pub mod error;
pub mod local_files;
pub mod normalize;
pub mod snapshot;
pub mod tidy;

// Public modules for CLI access
pub mod defaults;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use normalize::{is_normalized, normalize, NormalizeOptions, Normalizer};
pub use tidy::{plan_tree, rename_tree, rename_tree_with, RenameOptions, RenameReport};

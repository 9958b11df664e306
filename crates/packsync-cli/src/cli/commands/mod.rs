//! CLI command handlers. Each command is in its own file.

mod checksum;
mod clear;
mod files;
mod generate;
mod links;
mod preview;
mod status;
mod sync;

pub use checksum::run_checksum;
pub use clear::run_clear;
pub use files::run_files;
pub use generate::{run_completions, run_man};
pub use links::run_links;
pub use preview::run_preview;
pub use status::run_status;
pub use sync::run_sync;

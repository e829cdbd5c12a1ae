pub mod scenario;
pub mod ton;

pub use scenario::{handle_run_command, OutputFormat, RunOptions};
pub use ton::handle_validate_ton_command;

//! CLI command implementations

mod check;
mod emit;
mod init;
mod process;

pub use check::check_config;
pub use emit::emit_message;
pub use init::init_config;
pub use process::process_event;

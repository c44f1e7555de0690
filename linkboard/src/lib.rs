pub mod commands;
pub mod handlers;

pub use commands::{CLAP_STYLING, command_argument_builder};
pub use handlers::{load_options_from_args, parse_endpoint, resolve_output_path};

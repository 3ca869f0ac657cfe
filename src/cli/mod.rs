mod commands;

pub use commands::{execute, initialize_site_structure, Cli, Commands};

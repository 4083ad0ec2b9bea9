pub mod command;
pub mod join_config;
pub mod state_machine;

pub use command::*;
pub use join_config::*;
pub use state_machine::*;

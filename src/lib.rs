// ts2partition - command-line front end over the timestamp partition transform
//
// The binary resolves configuration (file, environment, CLI flags), builds a
// `TimestampTransform` and runs one of the commands in `commands`. Command
// functions return their output lines so they can be driven from tests.

pub mod commands;
mod init;

pub use commands::CliOverrides;
pub use init::init_tracing;

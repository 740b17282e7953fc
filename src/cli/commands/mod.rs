//! One module per subcommand; each exposes `execute`.

pub mod add;
pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod show;

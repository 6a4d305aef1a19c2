//! Command implementations for the tube-admin CLI.
//!
//! Each subcommand is implemented in its own module.

pub mod completions;
pub mod live;
pub mod login;
pub mod notifications;
pub mod users;

pub use completions::generate_completions;
pub use live::run_live;
pub use login::run_login;
pub use notifications::run_notifications;
pub use users::{run_bulk, run_list};

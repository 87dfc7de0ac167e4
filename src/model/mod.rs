pub mod config;
pub mod profile;
pub mod project;
pub mod session;
pub mod task;

pub use config::*;
pub use profile::*;
pub use project::*;
pub use session::*;
pub use task::*;

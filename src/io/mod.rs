pub mod config_io;
pub mod remote;
pub mod session;
pub mod store;

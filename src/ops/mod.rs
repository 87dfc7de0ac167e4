pub mod profile_ops;
pub mod project_ops;

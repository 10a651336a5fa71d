//! Configuration sources, in the order the loader applies them.

pub mod environment;
pub mod global_file;
pub mod workspace_file;

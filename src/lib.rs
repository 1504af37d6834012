pub mod config;
pub mod db;
pub mod http_error;
pub mod kernel;
pub mod plugins;

pub use crate::db::*;
pub use crate::kernel::*;

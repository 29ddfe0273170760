pub mod save_log;

pub use save_log::*;

mod logger;
pub mod progress;
pub mod style;

pub use logger::{init_logger, log_to_file};

pub mod logfile;
pub mod tracing;

pub use logfile::{LogDir, json_line};
pub use tracing::{CapturedEvent, init_test_tracing};

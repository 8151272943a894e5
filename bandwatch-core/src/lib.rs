pub mod analyzer;
pub mod cli;
pub mod config;
pub mod event;
pub mod logging;
pub mod netstat;
pub mod parser;
pub mod report;
pub mod source;
pub mod stats;
pub mod systemd;

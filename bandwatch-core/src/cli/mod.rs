pub mod args;
pub mod dashboard;
pub mod list;
pub mod reload;
pub mod run;

#[cfg(test)]
mod tests;

pub use args::AnalyzeArgs;
pub use list::ListCmd;
pub use run::run;

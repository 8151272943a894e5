use bandwatch_core::cli::{self, AnalyzeArgs, ListCmd};
use bandwatch_core::config::RunMode;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "bandwatch",
    version,
    about = "Bandwidth by client network, from web server access logs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Follow the log file(s) and show the top networks periodically
    Run(AnalyzeArgs),

    /// Follow one log file and log each network every time it crosses --print-delta
    Daemon(AnalyzeArgs),

    /// Read the log file(s) to the end and show the top networks once
    #[command(alias = "analyse")]
    Analyze(AnalyzeArgs),

    /// Read the log file(s) to the end and show statistics per top-level directory
    DirAnalyze(AnalyzeArgs),

    /// List built-in items
    List {
        #[command(subcommand)]
        cmd: ListCmd,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run(args) => cli::run(RunMode::Live, args),
        Command::Daemon(args) => cli::run(RunMode::Daemon, args),
        Command::Analyze(args) => cli::run(RunMode::Analyze, args),
        Command::DirAnalyze(args) => cli::run(RunMode::DirAnalyze, args),
        Command::List { cmd } => cli::list::run(cmd),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

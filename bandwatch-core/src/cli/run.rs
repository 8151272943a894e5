use crate::analyzer::{Analyzer, LineSink, SharedAnalyzer, run_fan_in, run_loop};
use crate::cli::AnalyzeArgs;
use crate::cli::dashboard::Dashboard;
use crate::cli::reload::handle_hangups;
use crate::config::RunMode;
use crate::logging::{SharedOutput, init_logging};
use crate::report::{SnapshotOptions, render_directory_rows, render_rows};
use crate::source::{FollowSource, LineSource, ScanSource, SourceError};
use crate::systemd;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::{Builder, Runtime};

/// Runs one of the analysis commands to completion.
pub fn run(mode: RunMode, args: AnalyzeArgs) -> Result<()> {
    let config = args.into_config(mode);
    config.validate()?;

    let files = config.input_files();
    let names: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
    eprintln!("Using log files: {}", names.join(" "));

    let output = SharedOutput::from_option(config.log_output.as_deref())?;
    let _guard = init_logging(&output, mode.is_batch())?;

    let whole = config.whole;
    let refresh = config.refresh;
    let analyzer = Analyzer::new(config).context("failed to create analyzer")?;

    // Control-plane runtime (signals, dashboard, fan-in)
    let control_rt = Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to build control runtime")?;

    control_rt.spawn({
        let output = output.clone();
        async move {
            if let Err(e) = handle_hangups(output).await {
                tracing::error!(error = %e, "signal handler failed");
            }
        }
    });

    match mode {
        RunMode::Analyze | RunMode::DirAnalyze => {
            let mut analyzer = analyzer;
            let result = analyze_files(&mut analyzer, &files);
            write_batch_report(&mut analyzer, &output, Utc::now())?;
            result.map_err(Into::into)
        }
        RunMode::Daemon => {
            let sources = open_followers(&files, whole)?;
            systemd::notify_ready().context("failed to notify service manager")?;
            drive(&control_rt, sources, analyzer)
        }
        RunMode::Live => {
            let sources = open_followers(&files, whole)?;
            let shared = SharedAnalyzer::new(analyzer);
            control_rt.spawn(Dashboard::new(shared.clone(), output.clone()).run(refresh));
            drive(&control_rt, sources, shared)
        }
    }
}

/// Reads `files` to the end, one after another. Stops at the first file
/// that cannot be read.
pub fn analyze_files(analyzer: &mut Analyzer, files: &[PathBuf]) -> Result<(), SourceError> {
    for path in files {
        let mut source = ScanSource::open(path)?;
        run_loop(&mut source, analyzer)?;
        tracing::debug!(path = %path.display(), records = analyzer.stats().len(), "file analyzed");
    }
    Ok(())
}

/// The end-of-run report for a batch analyzer.
pub fn batch_report(analyzer: &mut Analyzer, now: DateTime<Utc>) -> String {
    let config = analyzer.config();
    if config.mode == RunMode::DirAnalyze {
        let (top_n, sort_by) = (config.top_n, config.sort_by);
        return render_directory_rows(&analyzer.directory_report(top_n, sort_by, now));
    }

    let opts = SnapshotOptions::from_config(config);
    let rows = analyzer.snapshot(&opts, None, None, now);
    render_rows(&rows, false, false)
}

/// Writes the batch report to the output log, stdout unless `--outlog` is set.
pub fn write_batch_report(
    analyzer: &mut Analyzer,
    output: &SharedOutput,
    now: DateTime<Utc>,
) -> Result<()> {
    let report = batch_report(analyzer, now);
    let mut output = output.clone();
    output
        .write_all(report.as_bytes())
        .and_then(|_| output.flush())
        .context("failed to write report")
}

fn open_followers(files: &[PathBuf], whole: bool) -> Result<Vec<Box<dyn LineSource>>> {
    files
        .iter()
        .map(|path| {
            FollowSource::open(path, whole)
                .map(|source| Box::new(source) as Box<dyn LineSource>)
                .with_context(|| format!("failed to follow {}", path.display()))
        })
        .collect()
}

fn drive<K: LineSink>(
    rt: &Runtime,
    mut sources: Vec<Box<dyn LineSource>>,
    mut sink: K,
) -> Result<()> {
    if sources.len() == 1 {
        let mut source = sources.remove(0);
        run_loop(&mut source, &mut sink)?;
    } else {
        rt.block_on(run_fan_in(sources, &mut sink))?;
    }
    Ok(())
}

use crate::analyzer::SharedAnalyzer;
use crate::logging::SharedOutput;
use crate::netstat::active_connections;
use crate::report::{DisplayRecord, SnapshotOptions, render_rows, render_totals};
use crate::stats::PrefixLengths;
use chrono::{DateTime, Utc};
use std::io::{self, Write};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

/// Periodic top-N view over a live analyzer.
pub struct Dashboard {
    analyzer: SharedAnalyzer,
    opts: SnapshotOptions,
    prefixes: PrefixLengths,
    display: DisplayRecord,
    netstat: bool,
    color: bool,
    output: SharedOutput,
}

impl Dashboard {
    /// Frames are written to `output`, in color only when it is a terminal.
    pub fn new(analyzer: SharedAnalyzer, output: SharedOutput) -> Self {
        let (opts, prefixes, netstat) = {
            let guard = analyzer.lock();
            (
                SnapshotOptions::from_config(guard.config()),
                guard.prefixes(),
                !guard.config().no_netstat,
            )
        };
        Self {
            analyzer,
            opts,
            prefixes,
            display: DisplayRecord::default(),
            netstat,
            color: output.is_terminal(),
            output,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// One frame. Rows whose last access moved since the previous frame are
    /// bold.
    pub fn render(&mut self, now: DateTime<Utc>) -> String {
        let connections = if self.netstat {
            match active_connections(&self.prefixes) {
                Ok(counts) => Some(counts),
                Err(e) => {
                    tracing::warn!(error = %e, "netstat error");
                    None
                }
            }
        } else {
            None
        };

        let (rows, totals) = {
            let mut analyzer = self.analyzer.lock();
            let rows = analyzer.snapshot(&self.opts, Some(&self.display), connections.as_ref(), now);
            let totals = if analyzer.servers().len() > 1 {
                analyzer.server_totals()
            } else {
                Vec::new()
            };
            (rows, totals)
        };
        self.display.remember(&rows);

        let mut frame = render_rows(&rows, self.netstat, self.color);
        let totals: Vec<(String, u64)> = totals
            .into_iter()
            .filter(|(server, _)| !server.is_empty())
            .collect();
        if !totals.is_empty() {
            frame.push('\n');
            frame.push_str(&render_totals(&totals));
        }
        frame
    }

    /// Renders one frame and writes it to the output.
    pub fn draw(&mut self, now: DateTime<Utc>) -> io::Result<()> {
        let mut frame = self.render(now);
        frame.push('\n');
        self.output.write_all(frame.as_bytes())?;
        self.output.flush()
    }

    /// Redraws every `refresh` until the task is dropped.
    pub async fn run(mut self, refresh: Duration) {
        let mut ticker = interval(refresh);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = self.draw(Utc::now()) {
                tracing::warn!(error = %e, "failed to draw dashboard");
            }
        }
    }
}

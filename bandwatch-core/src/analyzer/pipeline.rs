use crate::analyzer::{Analyzer, FanInError, report_outcome};
use crate::source::{LineSource, SourceError};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Where ingested lines go. Per-line failures are reported by the sink
/// itself and never stop the loop.
pub trait LineSink {
    fn consume_line(&mut self, line: &[u8]);
}

impl LineSink for Analyzer {
    fn consume_line(&mut self, line: &[u8]) {
        report_outcome(self.ingest_line(line));
    }
}

/// Feeds every line of `source` into `sink` until the source ends.
///
/// A read error stops the loop and is returned.
pub fn run_loop<S, K>(source: &mut S, sink: &mut K) -> Result<(), SourceError>
where
    S: LineSource + ?Sized,
    K: LineSink + ?Sized,
{
    while let Some(line) = source.next_line()? {
        sink.consume_line(&line);
    }
    debug!(path = %source.path().display(), "source finished");
    Ok(())
}

/// Reads several sources at once and funnels their lines into one sink.
///
/// Each source runs on its own blocking task and pushes into a bounded queue;
/// the calling task drains it. A failing source does not stop the others.
/// Once every source is done, all failures are returned together.
pub async fn run_fan_in<K>(sources: Vec<Box<dyn LineSource>>, sink: &mut K) -> Result<(), FanInError>
where
    K: LineSink + ?Sized,
{
    let (tx, mut rx) = mpsc::channel::<Vec<u8>>((2 * sources.len()).max(1));
    let mut producers = JoinSet::new();

    for mut source in sources {
        let tx = tx.clone();
        producers.spawn_blocking(move || -> Result<(), SourceError> {
            while let Some(line) = source.next_line()? {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
            debug!(path = %source.path().display(), "source finished");
            Ok(())
        });
    }
    drop(tx);

    while let Some(line) = rx.recv().await {
        sink.consume_line(&line);
    }

    let mut errors = Vec::new();
    while let Some(joined) = producers.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "log source failed");
                errors.push(e);
            }
            Err(e) => errors.push(SourceError::Task(e.to_string())),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(FanInError { errors })
    }
}

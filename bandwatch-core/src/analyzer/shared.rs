use crate::analyzer::{Analyzer, IngestError, LineSink, Notification, report_outcome};
use crate::parser::{ParseError, Parser};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An [`Analyzer`] shared between the ingestion path and the dashboard.
///
/// Lines are parsed before the lock is taken, so the critical section covers
/// only the table update.
#[derive(Clone)]
pub struct SharedAnalyzer {
    inner: Arc<Mutex<Analyzer>>,
    parser: Arc<dyn Parser>,
}

impl SharedAnalyzer {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            parser: analyzer.parser(),
            inner: Arc::new(Mutex::new(analyzer)),
        }
    }

    /// Exclusive access for the duration of the guard.
    pub fn lock(&self) -> MutexGuard<'_, Analyzer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ingest_line(&self, line: &[u8]) -> Result<Option<Notification>, IngestError> {
        let event = match self.parser.parse(line) {
            Ok(event) => event,
            Err(ParseError::Ignored) => return Ok(None),
            Err(e) => return Err(IngestError::parse(line, e)),
        };
        self.lock().ingest(&event).map_err(|e| e.with_line(line))
    }
}

impl LineSink for SharedAnalyzer {
    fn consume_line(&mut self, line: &[u8]) {
        report_outcome(self.ingest_line(line));
    }
}

use anyhow::{Context, Result, anyhow};
use std::fs::{File, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt};


enum Target {
    Stdout,
    File { path: PathBuf, file: File },
}

/// Destination for log lines: stdout, or a file opened in append mode that
/// can be reopened after it has been rotated away.
#[derive(Clone)]
pub struct SharedOutput {
    target: Arc<Mutex<Target>>,
}

impl SharedOutput {
    pub fn stdout() -> Self {
        Self {
            target: Arc::new(Mutex::new(Target::Stdout)),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        Ok(Self {
            target: Arc::new(Mutex::new(Target::File { path, file })),
        })
    }

    pub fn from_option(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::file(path),
            None => Ok(Self::stdout()),
        }
    }

    /// Whether lines land on an interactive terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(&*self.lock(), Target::Stdout) && io::stdout().is_terminal()
    }

    /// Reopens the file by path. A no-op for stdout.
    pub fn reopen(&self) -> Result<()> {
        let mut target = self.lock();
        if let Target::File { path, file } = &mut *target {
            *file = open_append(path)?;
            tracing::info!(path = %path.display(), "output log reopened");
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Target> {
        self.target.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open output log {}", path.display()))
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut *self.lock() {
            Target::Stdout => io::stdout().write(buf),
            Target::File { file, .. } => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.lock() {
            Target::Stdout => io::stdout().flush(),
            Target::File { file, .. } => file.flush(),
        }
    }
}

/// Installs the global subscriber writing to `output` off-thread.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Batch runs leave
/// timestamps out. Keep the returned guard alive until exit so buffered
/// lines are flushed.
pub fn init_logging(output: &SharedOutput, batch: bool) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (writer, guard) = tracing_appender::non_blocking(output.clone());

    let builder = fmt().with_env_filter(filter).with_writer(writer).with_ansi(false);
    let installed = if batch {
        builder.without_time().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    Ok(guard)
}

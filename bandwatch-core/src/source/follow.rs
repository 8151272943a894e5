use crate::source::{LineSource, SourceError, trim_line_end};
use std::fs::{File, Metadata};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// How much of an existing log is read when not starting from the beginning.
pub const TAIL_WINDOW: u64 = 1024 * 1024;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileId {
    dev: u64,
    ino: u64,
}

#[cfg(unix)]
fn file_id(meta: &Metadata) -> FileId {
    use std::os::unix::fs::MetadataExt;
    FileId {
        dev: meta.dev(),
        ino: meta.ino(),
    }
}

#[cfg(not(unix))]
fn file_id(_meta: &Metadata) -> FileId {
    FileId { dev: 0, ino: 0 }
}

/// Follows a growing log file like `tail -F`.
///
/// Only complete lines are returned. When the file is replaced (rotation)
/// the new file is read from its start; when it shrinks (truncation) reading
/// restarts at offset zero. A missing file is waited for.
pub struct FollowSource {
    path: PathBuf,
    reader: BufReader<File>,
    id: FileId,
    offset: u64,
    pending: Vec<u8>,
    skip_first: bool,
    poll_interval: Duration,
}

impl FollowSource {
    /// Opens `path` for following.
    ///
    /// With `whole` the file is read from the start. Otherwise reading starts
    /// [`TAIL_WINDOW`] bytes before the end, and the first (likely partial)
    /// line is dropped; files smaller than the window are read whole.
    pub fn open(path: impl Into<PathBuf>, whole: bool) -> Result<Self, SourceError> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| SourceError::open(&path, e))?;
        let meta = file.metadata().map_err(|e| SourceError::open(&path, e))?;

        let mut reader = BufReader::new(file);
        let (offset, skip_first) = if whole || meta.len() < TAIL_WINDOW {
            (0, false)
        } else {
            let start = meta.len() - TAIL_WINDOW;
            reader
                .seek(SeekFrom::Start(start))
                .map_err(|e| SourceError::open(&path, e))?;
            (start, true)
        };

        debug!(path = %path.display(), offset, "following log file");

        Ok(Self {
            id: file_id(&meta),
            path,
            reader,
            offset,
            pending: Vec::new(),
            skip_first,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn reopen(&mut self) -> io::Result<()> {
        let file = File::open(&self.path)?;
        let meta = file.metadata()?;
        self.id = file_id(&meta);
        self.reader = BufReader::new(file);
        self.offset = 0;
        Ok(())
    }

    /// Called at end of file. Returns `true` when the underlying file was
    /// swapped or rewound and reading should resume right away.
    fn check_rotation(&mut self) -> io::Result<bool> {
        let meta = match std::fs::metadata(&self.path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };

        if file_id(&meta) != self.id {
            info!(path = %self.path.display(), "log file replaced, reopening");
            self.reopen()?;
            return Ok(true);
        }

        if meta.len() < self.offset {
            info!(path = %self.path.display(), "log file truncated, reading from start");
            self.reader.seek(SeekFrom::Start(0))?;
            self.offset = 0;
            self.pending.clear();
            return Ok(true);
        }

        Ok(false)
    }

    fn take_pending(&mut self) -> Vec<u8> {
        let mut line = std::mem::take(&mut self.pending);
        trim_line_end(&mut line);
        line
    }
}

impl LineSource for FollowSource {
    fn next_line(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        loop {
            let n = self
                .reader
                .read_until(b'\n', &mut self.pending)
                .map_err(|e| SourceError::read(&self.path, e))?;
            self.offset += n as u64;

            if self.pending.last() == Some(&b'\n') {
                let line = self.take_pending();
                if std::mem::take(&mut self.skip_first) {
                    continue;
                }
                return Ok(Some(line));
            }
            if n > 0 {
                continue;
            }

            let unfinished = !self.pending.is_empty();
            let swapped = self
                .check_rotation()
                .map_err(|e| SourceError::read(&self.path, e))?;

            if swapped {
                // A partial line left in a rotated-away file will never be completed.
                if unfinished && !self.pending.is_empty() {
                    let line = self.take_pending();
                    if !std::mem::take(&mut self.skip_first) {
                        return Ok(Some(line));
                    }
                }
                continue;
            }

            thread::sleep(self.poll_interval);
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

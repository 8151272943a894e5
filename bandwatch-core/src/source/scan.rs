use crate::source::decompress::open_decoded;
use crate::source::{LineSource, SourceError, trim_line_end};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

const READ_BUFFER: usize = 1024 * 1024;

/// Reads a file once from start to end.
pub struct ScanSource {
    path: PathBuf,
    reader: Box<dyn BufRead + Send>,
}

impl ScanSource {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let path = path.into();
        let inner = open_decoded(&path).map_err(|e| SourceError::open(&path, e))?;
        Ok(Self {
            reader: Box::new(BufReader::with_capacity(READ_BUFFER, inner)),
            path,
        })
    }

    /// Wraps an already open reader, e.g. stdin or an in-memory buffer.
    pub fn from_reader(path: impl Into<PathBuf>, reader: impl Read + Send + 'static) -> Self {
        Self {
            path: path.into(),
            reader: Box::new(BufReader::new(reader)),
        }
    }
}

impl LineSource for ScanSource {
    fn next_line(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        let mut line = Vec::new();
        let n = self
            .reader
            .read_until(b'\n', &mut line)
            .map_err(|e| SourceError::read(&self.path, e))?;
        if n == 0 {
            return Ok(None);
        }
        trim_line_end(&mut line);
        Ok(Some(line))
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

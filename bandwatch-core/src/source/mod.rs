mod decompress;
mod error;
mod follow;
mod scan;

#[cfg(test)]
mod tests;

pub use error::SourceError;
pub use follow::{FollowSource, TAIL_WINDOW};
pub use scan::ScanSource;

use std::path::Path;

/// A pull-based stream of raw log lines.
///
/// `Ok(None)` marks the end of the stream. Following sources never end on
/// their own and block inside `next_line` until more data shows up.
pub trait LineSource: Send {
    fn next_line(&mut self) -> Result<Option<Vec<u8>>, SourceError>;

    fn path(&self) -> &Path;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        (**self).next_line()
    }

    fn path(&self) -> &Path {
        (**self).path()
    }
}

/// Drops the line terminator (`\n` or `\r\n`).
pub(crate) fn trim_line_end(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
}

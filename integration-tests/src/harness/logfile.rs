use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Base timestamp used by every generated log line.
pub const EPOCH: i64 = 1_700_000_000;

/// One `nginx-json` access log line, `secs` after [`EPOCH`].
pub fn json_line(client: &str, size: u64, url: &str, secs: i64, server: &str) -> String {
    format!(
        r#"{{"timestamp":{},"clientip":"{client}","serverip":"{server}","url":"{url}","size":{size},"user_agent":"curl/8.5"}}"#,
        EPOCH + secs
    )
}

/// A scratch directory holding log files for one test.
pub struct LogDir {
    dir: TempDir,
}

impl LogDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes `lines` to a fresh plain-text file.
    pub fn write(&self, name: &str, lines: &[String]) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, join(lines)).unwrap();
        path
    }

    /// Writes `lines` gzip-compressed.
    pub fn write_gz(&self, name: &str, lines: &[String]) -> PathBuf {
        let path = self.path(name);
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(join(lines).as_bytes()).unwrap();
        fs::write(&path, encoder.finish().unwrap()).unwrap();
        path
    }

    pub fn append(&self, name: &str, lines: &[String]) {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(name))
            .unwrap();
        file.write_all(join(lines).as_bytes()).unwrap();
    }
}

impl Default for LogDir {
    fn default() -> Self {
        Self::new()
    }
}

fn join(lines: &[String]) -> String {
    lines.iter().map(|l| format!("{l}\n")).collect()
}

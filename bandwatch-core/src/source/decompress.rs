use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

/// Rotated archives decoded by an external tool.
const FILTER_COMMANDS: &[(&str, &[&str])] = &[
    ("xz", &["xz", "-cd", "-T", "0"]),
    ("zst", &["zstd", "-cd", "-T0"]),
];

/// Opens `path`, transparently decompressing `.gz`, `.xz` and `.zst` files.
pub fn open_decoded(path: &Path) -> io::Result<Box<dyn Read + Send>> {
    let file = File::open(path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

    if ext == "gz" {
        return Ok(Box::new(MultiGzDecoder::new(file)));
    }

    match FILTER_COMMANDS.iter().find(|(e, _)| *e == ext) {
        Some((_, argv)) => Ok(Box::new(FilterReader::spawn(argv, file)?)),
        None => Ok(Box::new(file)),
    }
}

/// Reads the stdout of a decompressor fed with the file on stdin.
struct FilterReader {
    program: &'static str,
    child: Child,
    stdout: ChildStdout,
    finished: bool,
}

impl FilterReader {
    fn spawn(argv: &[&'static str], input: File) -> io::Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::other("empty filter command"))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::from(input))
            .stdout(Stdio::piped())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("filter command has no stdout"))?;

        Ok(Self {
            program,
            child,
            stdout,
            finished: false,
        })
    }
}

impl Read for FilterReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.stdout.read(buf)?;
        if n == 0 && !buf.is_empty() && !self.finished {
            self.finished = true;
            let status = self.child.wait()?;
            if !status.success() {
                return Err(io::Error::other(format!(
                    "{} exited with {status}",
                    self.program
                )));
            }
        }
        Ok(n)
    }
}

impl Drop for FilterReader {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

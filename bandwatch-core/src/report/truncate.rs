/// Archive suffixes treated as part of a file's extension.
const COMPRESSION_SUFFIXES: [&str; 4] = [".gz", ".bz2", ".xz", ".zst"];

/// How URLs are shortened for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlTruncation {
    #[default]
    None,
    /// Collapse interior directories into `...`.
    Structural,
    /// Structural, then squeeze to at most this many bytes.
    ToLength(usize),
}

impl UrlTruncation {
    pub fn new(truncate: bool, truncate_to: usize) -> Self {
        if truncate_to > 0 {
            Self::ToLength(truncate_to)
        } else if truncate {
            Self::Structural
        } else {
            Self::None
        }
    }

    pub fn apply(self, url: &str) -> String {
        match self {
            Self::None => url.to_string(),
            Self::Structural => truncate_url_path(url),
            Self::ToLength(target) => truncate_url_path_len(url, target),
        }
    }
}

/// Lexical path cleanup: merges slashes, drops `.` and resolves `..`.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// `/first/.../last` with the query collapsed to `?...`.
///
/// A trailing slash survives so directories still read as directories.
pub fn truncate_url_path(input: &str) -> String {
    let (raw_path, args) = match input.split_once('?') {
        Some((path, _)) => (path, "?..."),
        None => (input, ""),
    };

    let mut path = clean_path(raw_path);
    if raw_path.ends_with('/') && !path.ends_with('/') {
        path.push('/');
    }

    let slashes = path.matches('/').count();
    if slashes <= 2 || !path.starts_with('/') {
        return path + args;
    }

    let parts: Vec<&str> = path.split('/').collect();
    let last = parts.len() - 1;
    if parts[last].is_empty() {
        if slashes == 3 {
            return path + args;
        }
        return format!("/{}/.../{}/{args}", parts[1], parts[last - 1]);
    }
    format!("/{}/.../{}{args}", parts[1], parts[last])
}

/// [`truncate_url_path`], then shortened to at most `target` bytes.
///
/// The query marker goes first, then the file (or last directory) name is
/// squeezed keeping its extension; only if that cannot fit is the result cut.
pub fn truncate_url_path_len(input: &str, target: usize) -> String {
    let stub = truncate_url_path(input);
    if stub.len() <= target {
        return stub;
    }

    let stub = stub.split_once('?').map_or(stub.as_str(), |(path, _)| path);
    if stub.len() < target {
        return format!("{stub}?");
    }
    if stub.len() == target {
        return stub.to_string();
    }

    let mut parts: Vec<String> = stub.splitn(4, '/').map(str::to_string).collect();
    let mut name_idx = parts.len() - 1;
    if parts[name_idx].is_empty() && name_idx > 0 {
        name_idx -= 1;
    }

    let excess = stub.len() - target;
    if parts[name_idx].len() > excess {
        let name_target = parts[name_idx].len() - excess;
        parts[name_idx] = truncate_filename_len(&parts[name_idx], name_target);
        return parts.join("/");
    }

    prefix_bytes(stub, target).to_string()
}

/// Final extension of `name` including the dot, like `.ext`; empty if none.
fn extension(name: &str) -> &str {
    name.rfind('.').map_or("", |i| &name[i..])
}

/// Shortens a file name to `target` bytes, keeping its extension.
pub fn truncate_filename_len(input: &str, target: usize) -> String {
    if input.len() <= target {
        return input.to_string();
    }

    let mut ext = extension(input);
    if COMPRESSION_SUFFIXES.contains(&ext) {
        let inner = &input[..input.len() - ext.len()];
        ext = &input[input.len() - ext.len() - extension(inner).len()..];
    }
    let basename = &input[..input.len() - ext.len()];

    let excess = input.len() - target;
    if basename.len() > excess {
        let keep = basename.len() - excess;
        if !ext.is_empty() && keep > 2 {
            return format!("{}..{ext}", prefix_bytes(basename, keep - 2));
        } else if keep > 3 {
            return format!("{}...", prefix_bytes(basename, keep - 3));
        }
        return format!("*{ext}");
    }

    suffix_bytes(input, target).to_string()
}

/// Longest prefix of at most `n` bytes ending on a char boundary.
fn prefix_bytes(s: &str, n: usize) -> &str {
    let mut end = n.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Longest suffix of at most `n` bytes starting on a char boundary.
fn suffix_bytes(s: &str, n: usize) -> &str {
    let mut start = s.len().saturating_sub(n);
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}

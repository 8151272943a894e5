mod directory;
mod humanize;
mod snapshot;
mod table;
mod truncate;

#[cfg(test)]
mod tests;

pub use directory::{DirectoryRow, build_directory_rows, render_directory_rows};
pub use humanize::{ABSOLUTE_TIME_FORMAT, format_absolute, format_iec, format_relative};
pub use snapshot::{
    DisplayRecord, SnapshotOptions, SnapshotRow, build_rows, render_rows, render_totals,
};
pub use table::{Align, TextTable};
pub use truncate::{
    UrlTruncation, clean_path, truncate_filename_len, truncate_url_path, truncate_url_path_len,
};

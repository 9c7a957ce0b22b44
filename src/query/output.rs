// Query result printing, grep style

use super::{FileHits, QueryMode};
use crate::utils::paths::display_path;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Prefix every line with the file path
    pub show_path: bool,
    /// Print one count per file instead of the hits
    pub count_only: bool,
    /// Surrounding source lines per hit
    pub context: usize,
}

/// Paths are shown when more than one file may match, unless suppressed
pub fn should_show_path(no_path: bool, file_count: usize, used_glob_or_search: bool) -> bool {
    !no_path && (file_count > 1 || used_glob_or_search)
}

/// Print one file's hits and return how many there were
pub fn write_file_hits<W: Write>(
    out: &mut W,
    file: &FileHits,
    mode: &QueryMode,
    options: &OutputOptions,
) -> io::Result<usize> {
    if file.hits.is_empty() {
        return Ok(0);
    }
    let path = display_path(&file.path);

    if options.count_only {
        writeln!(out, "{:4}  {}", file.hits.len(), path)?;
        return Ok(file.hits.len());
    }

    for hit in &file.hits {
        if options.show_path {
            writeln!(out, "{}:{}: {}", path, hit.line, hit.text)?;
        } else {
            writeln!(out, "{}: {}", hit.line, hit.text)?;
        }

        if options.context == 0 || !mode.supports_context() || hit.line == 0 {
            continue;
        }
        let row = hit.line - 1;
        let start = row.saturating_sub(options.context);
        let end = (row + options.context + 1).min(file.lines.len());
        for (i, line) in file.lines.iter().enumerate().take(end).skip(start) {
            if i == row {
                continue;
            }
            if options.show_path {
                writeln!(out, "  {}:{}- {}", path, i + 1, line)?;
            } else {
                writeln!(out, "  {}- {}", i + 1, line)?;
            }
        }
        writeln!(out)?;
    }
    Ok(file.hits.len())
}

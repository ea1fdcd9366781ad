//! File discovery, binary sniffing, and guarded line reading.

use ignore::WalkBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::config::RuleSet;
use crate::constants::{MAX_LINE_LENGTH, MAX_REPEAT_RUN, SNIFF_LEN, TEXT_RATIO};

/// Decides which files are scanned and reads their content defensively.
pub struct FileHandler {
    ignore_dirs: FxHashSet<String>,
    ignore_extensions: FxHashSet<String>,
    ignore_files: FxHashSet<String>,
}

impl FileHandler {
    /// Builds a handler from the rule set's ignore lists. Extensions are
    /// compared lowercase.
    #[must_use]
    pub fn new(rules: &RuleSet) -> Self {
        Self {
            ignore_dirs: rules.ignore_dirs.iter().cloned().collect(),
            ignore_extensions: rules
                .ignore_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            ignore_files: rules.ignore_files.iter().cloned().collect(),
        }
    }

    /// Whether this file should be skipped: ignored name, ignored extension,
    /// or binary-looking content.
    #[must_use]
    pub fn should_skip(&self, path: &Path) -> bool {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if self.ignore_files.contains(name) {
                return true;
            }
        }
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if self.ignore_extensions.contains(&format!(".{}", ext.to_lowercase())) {
                return true;
            }
        }
        !is_text_file(path)
    }

    /// Collects the files to scan under `root`, in walk order.
    ///
    /// Ignored directory names are never descended into; ignored and
    /// binary-looking files are dropped. Traversal errors (permission
    /// denied, dangling symlinks) are logged and skipped, never fatal.
    #[must_use]
    pub fn collect_files(&self, root: &Path) -> Vec<PathBuf> {
        if root.is_file() {
            if self.should_skip(root) {
                return Vec::new();
            }
            return vec![root.to_path_buf()];
        }

        let ignore_dirs = self.ignore_dirs.clone();
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                if !is_dir {
                    return true;
                }
                !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| ignore_dirs.contains(name))
            });

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!("skipping unreadable entry: {err}");
                    continue;
                }
            };
            if entry.file_type().is_some_and(|t| t.is_file()) {
                let path = entry.into_path();
                if !self.should_skip(&path) {
                    files.push(path);
                }
            }
        }
        files
    }
}

/// Streams a file's lines with the anti-DoS guards applied.
///
/// Each line is read incrementally and decoded lossily, so invalid UTF-8
/// never fails a scan and a pathological file never has to fit in memory.
/// A line longer than [`MAX_LINE_LENGTH`] characters, or containing a run
/// of [`MAX_REPEAT_RUN`] identical characters, ends the stream at that
/// point; lines yielded before it stand.
pub struct LineReader {
    reader: BufReader<File>,
    buf: Vec<u8>,
    lines_read: usize,
    done: bool,
    path: PathBuf,
}

impl LineReader {
    /// Opens a file for guarded line iteration.
    ///
    /// # Errors
    ///
    /// Fails only when the file cannot be opened.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            reader: BufReader::new(File::open(path)?),
            buf: Vec::new(),
            lines_read: 0,
            done: false,
            path: path.to_path_buf(),
        })
    }

    fn stop(&mut self) -> Option<String> {
        tracing::debug!(
            "stopping early in {}: pathological line after {} lines",
            self.path.display(),
            self.lines_read
        );
        self.done = true;
        None
    }

    /// Accumulates raw bytes up to the next newline. Returns false at end
    /// of input, or when the line already exceeds what the length guard
    /// could possibly accept (four bytes per character, worst case), so an
    /// oversized line is abandoned without reading the rest of it.
    fn fill_next_line(&mut self) -> std::io::Result<bool> {
        self.buf.clear();
        loop {
            let chunk = self.reader.fill_buf()?;
            if chunk.is_empty() {
                return Ok(!self.buf.is_empty());
            }
            if let Some(pos) = chunk.iter().position(|&b| b == b'\n') {
                self.buf.extend_from_slice(&chunk[..pos]);
                self.reader.consume(pos + 1);
                return Ok(true);
            }
            self.buf.extend_from_slice(chunk);
            let consumed = chunk.len();
            self.reader.consume(consumed);
            if self.buf.len() > MAX_LINE_LENGTH * 4 {
                return Ok(false);
            }
        }
    }
}

impl Iterator for LineReader {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        match self.fill_next_line() {
            Ok(true) => {}
            Ok(false) => {
                if self.buf.is_empty() {
                    self.done = true;
                    return None;
                }
                return self.stop();
            }
            Err(err) => {
                tracing::debug!("read error in {}: {err}", self.path.display());
                self.done = true;
                return None;
            }
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        if line.chars().count() > MAX_LINE_LENGTH || has_long_run(&line) {
            return self.stop();
        }
        self.lines_read += 1;
        Some(line)
    }
}

/// Sniffs the head of a file and decides whether it looks like text: no NUL
/// bytes and a high enough ratio of printable bytes. Unreadable files count
/// as non-text; empty files count as text.
#[must_use]
pub fn is_text_file(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut head = Vec::with_capacity(SNIFF_LEN);
    if file.take(SNIFF_LEN as u64).read_to_end(&mut head).is_err() {
        return false;
    }
    if head.is_empty() {
        return true;
    }
    if head.contains(&0) {
        return false;
    }
    let printable = head
        .iter()
        .filter(|&&b| b == b'\t' || b == b'\n' || b == b'\r' || (0x20..0x7f).contains(&b))
        .count();
    let ratio = printable as f64 / head.len() as f64;
    ratio > TEXT_RATIO
}

fn has_long_run(line: &str) -> bool {
    let mut prev: Option<char> = None;
    let mut run = 0usize;
    for c in line.chars() {
        if prev == Some(c) {
            run += 1;
            if run >= MAX_REPEAT_RUN {
                return true;
            }
        } else {
            prev = Some(c);
            run = 1;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_rule_set;
    use std::io::Write;
    use std::path::PathBuf;

    fn handler() -> FileHandler {
        FileHandler::new(&load_rule_set::<PathBuf>(&[]).unwrap())
    }

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut f = File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    #[test]
    fn binary_content_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bin = write_file(dir.path(), "blob.dat", &[0x7f, b'E', b'L', b'F', 0, 0, 1]);
        let txt = write_file(dir.path(), "ok.txt", b"hello world\n");
        assert!(!is_text_file(&bin));
        assert!(is_text_file(&txt));
    }

    #[test]
    fn empty_file_counts_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write_file(dir.path(), "empty.txt", b"");
        assert!(is_text_file(&empty));
    }

    #[test]
    fn ignored_extensions_and_lockfiles_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let png = write_file(dir.path(), "logo.PNG", b"not really an image");
        let lock = write_file(dir.path(), "package-lock.json", b"{}");
        let handler = handler();
        assert!(handler.should_skip(&png));
        assert!(handler.should_skip(&lock));
    }

    #[test]
    fn collect_skips_ignored_directories() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "src/app.py", b"print('hi')\n");
        write_file(dir.path(), "node_modules/lib/index.js", b"module.exports = 1\n");
        write_file(dir.path(), ".git/config", b"[core]\n");
        let files = handler().collect_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/app.py"));
    }

    #[test]
    fn collect_on_single_file_returns_it() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(dir.path(), "cfg.env", b"A=1\n");
        let files = handler().collect_files(&file);
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn read_stops_at_repeat_run_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut content = String::from("first = 1\nsecond = 2\n");
        content.push_str(&"z".repeat(MAX_REPEAT_RUN + 10));
        content.push_str("\nnever_reached = 3\n");
        let path = write_file(dir.path(), "wall.txt", content.as_bytes());
        let lines: Vec<String> = LineReader::open(&path).unwrap().collect();
        assert_eq!(lines, vec!["first = 1", "second = 2"]);
    }

    #[test]
    fn read_stops_at_overlong_line_without_slurping_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut content = String::from("kept = 1\n");
        // Mixed content so the repeat-run guard stays out of the way; only
        // the length guard can fire.
        for _ in 0..=MAX_LINE_LENGTH / 2 {
            content.push_str("ab");
        }
        content.push_str("\nnever_reached = 2\n");
        let path = write_file(dir.path(), "minified.js", content.as_bytes());
        let lines: Vec<String> = LineReader::open(&path).unwrap().collect();
        assert_eq!(lines, vec!["kept = 1"]);
    }

    #[test]
    fn read_decodes_invalid_utf8_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "mixed.txt", b"key = value\xff\n");
        let lines: Vec<String> = LineReader::open(&path).unwrap().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("key = value"));
    }

    #[test]
    fn read_yields_trailing_unterminated_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "tail.txt", b"one = 1\ntwo = 2");
        let lines: Vec<String> = LineReader::open(&path).unwrap().collect();
        assert_eq!(lines, vec!["one = 1", "two = 2"]);
    }

    #[test]
    fn open_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LineReader::open(&dir.path().join("ghost.py")).is_err());
    }
}

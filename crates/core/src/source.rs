//! Parse sources: where the parser gets more characters from.
//!
//! A [`ParseSource`] yields spans of text until it is exhausted. Once
//! [`ParseSource::more`] has returned `None` it keeps returning `None`.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Producer of source text for the [`Parser`](crate::parser::Parser).
pub trait ParseSource {
    /// Next non-empty span of text, or `None` once the source is exhausted.
    fn more(&mut self) -> Option<String>;

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        "<input>"
    }
}

impl<S: ParseSource + ?Sized> ParseSource for &mut S {
    fn more(&mut self) -> Option<String> {
        (**self).more()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: ParseSource + ?Sized> ParseSource for Box<S> {
    fn more(&mut self) -> Option<String> {
        (**self).more()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ── Interactive ──────────────────────────────────────────────────────

/// Line-at-a-time interactive source.
///
/// Prints a `- ` prompt before every read and skips blank lines. It only
/// becomes exhausted when the underlying reader reaches end of stream or
/// fails.
pub struct ConsoleSource<R, W> {
    reader: R,
    prompt: W,
    closed: bool,
}

impl<R: BufRead, W: Write> ConsoleSource<R, W> {
    pub fn new(reader: R, prompt: W) -> Self {
        ConsoleSource {
            reader,
            prompt,
            closed: false,
        }
    }

    /// The reader reached end of stream (or failed).
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ConsoleSource<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Console source over the process's stdin. The prompt goes to stderr
    /// so stdout carries only output.
    pub fn stdio() -> Self {
        ConsoleSource::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> ParseSource for ConsoleSource<R, W> {
    fn more(&mut self) -> Option<String> {
        if self.closed {
            return None;
        }
        loop {
            // A broken prompt stream is not a reason to stop reading input.
            let _ = write!(self.prompt, "- ");
            let _ = self.prompt.flush();

            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.closed = true;
                    return None;
                }
                Ok(_) => {
                    let text = line.trim_start();
                    if !text.is_empty() {
                        return Some(text.to_owned());
                    }
                }
                Err(e) => {
                    tracing::warn!("console read failed: {}", e);
                    self.closed = true;
                    return None;
                }
            }
        }
    }

    fn name(&self) -> &str {
        "<console>"
    }
}

// ── Whole file ───────────────────────────────────────────────────────

/// Single-shot source reading a whole file on the first call.
pub struct FileSource {
    path: PathBuf,
    name: String,
    done: bool,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        FileSource {
            name: path.display().to_string(),
            path,
            done: false,
        }
    }
}

impl ParseSource for FileSource {
    fn more(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        self.done = true;

        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => None,
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                tracing::warn!("could not open file '{}': {}", self.name, e);
                None
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ── In-memory block ──────────────────────────────────────────────────

/// Single-shot source over a borrowed byte buffer.
pub struct BlockSource<'a> {
    data: &'a [u8],
    name: String,
    done: bool,
}

impl<'a> BlockSource<'a> {
    /// Wrap a NUL-terminated block: text ends at the first NUL byte, or at
    /// the end of the slice if there is none.
    pub fn new(block: &'a [u8]) -> Self {
        let len = block.iter().position(|&b| b == 0).unwrap_or(block.len());
        Self::with_len(block, len)
    }

    /// Wrap exactly `len` bytes of `block` (embedded NULs are kept). A
    /// length past the end of the slice is clamped to the slice.
    pub fn with_len(block: &'a [u8], len: usize) -> Self {
        BlockSource {
            data: &block[..len.min(block.len())],
            name: "<block>".to_owned(),
            done: false,
        }
    }

    /// Set the name reported in diagnostics.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl ParseSource for BlockSource<'_> {
    fn more(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        self.done = true;
        if self.data.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(self.data).into_owned())
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn block_source_yields_once() {
        let mut src = BlockSource::new(b"name = 1");
        assert_eq!(src.more().as_deref(), Some("name = 1"));
        assert_eq!(src.more(), None);
        assert_eq!(src.more(), None);
    }

    #[test]
    fn block_source_stops_at_nul() {
        let mut src = BlockSource::new(b"a = 1\0garbage");
        assert_eq!(src.more().as_deref(), Some("a = 1"));
    }

    #[test]
    fn block_source_with_len_keeps_embedded_nul() {
        let data = b"a\0b\0c";
        let mut src = BlockSource::with_len(data, 3);
        assert_eq!(src.more().as_deref(), Some("a\0b"));
    }

    #[test]
    fn block_source_with_len_is_clamped() {
        let mut src = BlockSource::with_len(b"abc", 100);
        assert_eq!(src.more().as_deref(), Some("abc"));
    }

    #[test]
    fn empty_block_is_terminal_immediately() {
        let mut src = BlockSource::new(b"");
        assert_eq!(src.more(), None);
    }

    #[test]
    fn block_source_name_defaults_and_overrides() {
        assert_eq!(BlockSource::new(b"x").name(), "<block>");
        assert_eq!(BlockSource::new(b"x").named("zones.def").name(), "zones.def");
    }

    #[test]
    fn file_source_second_call_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.def");
        std::fs::write(&path, "\"ZONES\"\n").unwrap();

        let mut src = FileSource::new(&path);
        assert_eq!(src.more().as_deref(), Some("\"ZONES\"\n"));
        assert_eq!(src.more(), None);
        assert_eq!(src.more(), None);
    }

    #[test]
    fn file_source_missing_file_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let mut src = FileSource::new(dir.path().join("missing.def"));
        assert_eq!(src.more(), None);
        assert_eq!(src.more(), None);
    }

    #[test]
    fn console_source_skips_blank_lines_and_prompts() {
        let input = Cursor::new("\n   \n  name = 1\n");
        let mut prompt = Vec::new();
        let mut src = ConsoleSource::new(input, &mut prompt);
        assert_eq!(src.more().as_deref(), Some("name = 1\n"));
        assert_eq!(src.more(), None);
        drop(src);
        // three prompts for the three lines, one more for end of stream
        assert_eq!(String::from_utf8(prompt).unwrap(), "- - - - ");
    }

    #[test]
    fn console_source_stays_closed() {
        let mut src = ConsoleSource::new(Cursor::new(""), Vec::new());
        assert_eq!(src.more(), None);
        assert_eq!(src.more(), None);
    }
}

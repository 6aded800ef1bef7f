//! Resolved stack frames.

use derive_getters::Getters;
use std::collections::HashMap;
use std::ffi::c_void;
use std::fmt;
use std::path::{Path, PathBuf};

/// Placeholder for any part of a location the symbolizer could not resolve.
pub const UNKNOWN: &str = "<unknown>";

/// A single resolved entry of a captured call stack.
///
/// Frames are produced once per captured program counter and never change
/// afterwards. The [`Display`](fmt::Display) form is the conventional dump
/// format used by [`CapturedStack::render`](crate::CapturedStack::render):
///
/// ```text
/// <function> (<file>:<line>)
/// 	<source-line>
/// ```
///
/// The second line only appears when the source file was readable.
///
/// # Examples
///
/// ```
/// use provenance_stack::StackFrame;
///
/// let frame = StackFrame::new("app::main", "src/main.rs", 12, 0x1000)
///     .with_source("run()?;");
/// assert_eq!(frame.to_string(), "app::main (src/main.rs:12)\n\trun()?;\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
pub struct StackFrame {
    /// Fully qualified function name, without the symbol hash
    function: String,
    /// Source file the frame points into
    file: String,
    /// One-based line number, 0 when unknown
    line: u32,
    /// Trimmed text of the source line
    #[getter(skip)]
    source: Option<String>,
    /// Raw program counter the frame was resolved from
    address: usize,
}

impl StackFrame {
    /// Create a frame from already resolved location data.
    pub fn new(
        function: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        address: usize,
    ) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
            source: None,
            address,
        }
    }

    /// Sentinel frame for an address that could not be symbolized.
    pub fn unknown(address: usize) -> Self {
        Self::new(UNKNOWN, UNKNOWN, 0, address)
    }

    /// Attach the text of the source line.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The source line text, if the file could be read.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Whether this is the sentinel produced for an unresolvable address.
    pub fn is_unknown(&self) -> bool {
        self.function == UNKNOWN && self.file == UNKNOWN
    }

    /// Symbolize a raw program counter.
    ///
    /// Inlined call sites can yield several symbols for one address; the
    /// innermost one is used so each address maps to exactly one frame.
    pub(crate) fn resolve(address: usize, sources: &mut SourceCache) -> Self {
        let mut resolved: Option<(String, Option<PathBuf>, u32)> = None;

        backtrace::resolve(address as *mut c_void, |symbol| {
            if resolved.is_some() {
                return;
            }
            let function = symbol
                .name()
                .map(|name| format!("{:#}", name))
                .unwrap_or_else(|| UNKNOWN.to_string());
            let file = symbol.filename().map(Path::to_path_buf);
            let line = symbol.lineno().unwrap_or(0);
            resolved = Some((function, file, line));
        });

        let Some((function, file, line)) = resolved else {
            return Self::unknown(address);
        };

        match file {
            Some(path) => {
                let frame = Self::new(function, path.display().to_string(), line, address);
                match sources.line(&path, line) {
                    Some(text) => frame.with_source(text),
                    None => frame,
                }
            }
            None => Self::new(function, UNKNOWN, line, address),
        }
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}:{})", self.function, self.file, self.line)?;
        if let Some(source) = &self.source {
            writeln!(f, "\t{}", source)?;
        }
        Ok(())
    }
}

/// Source files read during one resolution pass, keyed by path.
///
/// Unreadable files are remembered as `None` so they are only tried once.
#[derive(Debug, Default)]
pub(crate) struct SourceCache {
    files: HashMap<PathBuf, Option<Vec<String>>>,
}

impl SourceCache {
    fn line(&mut self, path: &Path, line: u32) -> Option<String> {
        if line == 0 {
            return None;
        }
        let lines = self.files.entry(path.to_path_buf()).or_insert_with(|| {
            std::fs::read_to_string(path)
                .ok()
                .map(|text| text.lines().map(str::to_owned).collect())
        });
        let text = lines.as_ref()?.get(line as usize - 1)?.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn display_without_source() {
        let frame = StackFrame::new("crate::run", "src/lib.rs", 7, 0);
        assert_eq!(frame.to_string(), "crate::run (src/lib.rs:7)\n");
    }

    #[test]
    fn display_with_source() {
        let frame = StackFrame::new("crate::run", "src/lib.rs", 7, 0).with_source("let x = 1;");
        assert_eq!(frame.to_string(), "crate::run (src/lib.rs:7)\n\tlet x = 1;\n");
    }

    #[test]
    fn unknown_sentinel() {
        let frame = StackFrame::unknown(0xdead);
        assert!(frame.is_unknown());
        assert_eq!(*frame.address(), 0xdead);
        assert_eq!(frame.to_string(), "<unknown> (<unknown>:0)\n");
    }

    #[test]
    fn source_cache_trims_and_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fn main() {{").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "    do_work();   ").unwrap();

        let mut cache = SourceCache::default();
        assert_eq!(cache.line(file.path(), 1).as_deref(), Some("fn main() {"));
        assert_eq!(cache.line(file.path(), 2), None);
        assert_eq!(cache.line(file.path(), 3).as_deref(), Some("do_work();"));
        assert_eq!(cache.line(file.path(), 0), None);
        assert_eq!(cache.line(file.path(), 99), None);
        assert_eq!(cache.files.len(), 1);
    }

    #[test]
    fn source_cache_remembers_missing_files() {
        let mut cache = SourceCache::default();
        let path = Path::new("/definitely/not/here.rs");
        assert_eq!(cache.line(path, 1), None);
        assert!(cache.files.get(path).unwrap().is_none());
    }
}

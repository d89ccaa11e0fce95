//! Trace input.
//!
//! A [`TraceSource`] can be opened more than once: OPT pre-scans the whole
//! trace before the streaming pass starts.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Cursor},
    path::{Path, PathBuf},
};

pub trait TraceSource {
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>>;

    /// Where the trace lives, for diagnostics.
    fn location(&self) -> &Path;
}

/// A trace stored in a file, one reference per line.
#[derive(Debug, Clone)]
pub struct TraceFile {
    path: PathBuf,
}

impl TraceFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        TraceFile {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TraceSource for TraceFile {
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::options().read(true).open(&self.path)?;

        Ok(Box::new(BufReader::new(file)))
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// A trace held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrace {
    text: String,
}

impl InMemoryTrace {
    pub fn new<S: Into<String>>(text: S) -> Self {
        InMemoryTrace { text: text.into() }
    }
}

impl TraceSource for InMemoryTrace {
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(Cursor::new(self.text.as_bytes())))
    }

    fn location(&self) -> &Path {
        Path::new("<memory>")
    }
}

/// Yields `(position, line)` for every line of a trace, malformed or not.
///
/// Invalid UTF-8 is replaced lossily; the replacement character never forms
/// a valid address or operation token, so such lines still fail to decode.
pub struct TraceReader<'a> {
    reader: Box<dyn BufRead + 'a>,
    position: usize,
    buffer: Vec<u8>,
}

impl<'a> TraceReader<'a> {
    pub fn open<S: TraceSource + ?Sized>(source: &'a S) -> io::Result<Self> {
        Ok(TraceReader {
            reader: source.open()?,
            position: 0,
            buffer: Vec::new(),
        })
    }
}

impl Iterator for TraceReader<'_> {
    type Item = io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();

        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                while matches!(self.buffer.last(), Some(&(b'\n' | b'\r'))) {
                    self.buffer.pop();
                }

                let position = self.position;
                self.position += 1;

                Some(Ok((position, String::from_utf8_lossy(&self.buffer).into_owned())))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

pub fn count_lines<S: TraceSource + ?Sized>(source: &S) -> io::Result<usize> {
    let mut count = 0;

    for line in TraceReader::open(source)? {
        line?;
        count += 1;
    }

    Ok(count)
}

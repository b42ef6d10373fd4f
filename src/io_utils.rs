//! File and CSV plumbing for the conversion pipeline.
//!
//! - **Opening**: [`open_input`] and [`create_output`] map I/O failures to
//!   [`BatchError::ResourceOpen`] with the offending path.
//! - **Records**: [`RawRecords`] splits input on physical lines, keeping a
//!   record open across lines while it has an unbalanced quote. Blank lines are
//!   yielded as empty records instead of being skipped, and every record knows
//!   the line it starts on.
//! - **Reader**: each raw record is parsed without header handling and in
//!   flexible mode, so the pipeline checks field counts itself.
//! - **Writer**: fields are quoted only when they must be, so pass-through fields
//!   come out byte-for-byte as they went in.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use csv::{QuoteStyle, StringRecord, Terminator};

use crate::error::{Access, BatchError};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

pub fn open_input(path: &Path) -> Result<BufReader<File>, BatchError> {
    let file = File::open(path).map_err(|source| BatchError::ResourceOpen {
        path: path.to_path_buf(),
        access: Access::Read,
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Creates `path`, truncating any existing file.
pub fn create_output(path: &Path) -> Result<BufWriter<File>, BatchError> {
    let file = File::create(path).map_err(|source| BatchError::ResourceOpen {
        path: path.to_path_buf(),
        access: Access::Write,
        source,
    })?;
    Ok(BufWriter::new(file))
}

pub fn open_csv_reader<R>(reader: R) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(DEFAULT_CSV_DELIMITER)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

/// Parses one raw record. An empty slice gives a record with no fields.
pub fn parse_record(bytes: &[u8]) -> Result<StringRecord, csv::Error> {
    let mut reader = open_csv_reader(bytes);
    let mut record = StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record)
}

/// One logical CSV record and the 1-based line it starts on, terminator removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub line: u64,
    pub bytes: Vec<u8>,
}

pub struct RawRecords<R> {
    input: R,
    next_line: u64,
}

impl<R: BufRead> RawRecords<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            next_line: 1,
        }
    }

    /// Line the next record will start on.
    pub fn next_line(&self) -> u64 {
        self.next_line
    }
}

impl<R: BufRead> Iterator for RawRecords<R> {
    type Item = io::Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.next_line;
        let mut bytes = Vec::new();
        loop {
            match self.input.read_until(b'\n', &mut bytes) {
                Ok(0) => break,
                Ok(_) => {
                    self.next_line += 1;
                    if !has_open_quote(&bytes) {
                        break;
                    }
                }
                Err(err) => return Some(Err(err)),
            }
        }
        if bytes.is_empty() {
            return None;
        }
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
        }
        Some(Ok(RawRecord { line, bytes }))
    }
}

// Escaped quotes come in pairs, so an odd count means a quoted field is still open.
fn has_open_quote(bytes: &[u8]) -> bool {
    bytes.iter().filter(|&&b| b == b'"').count() % 2 == 1
}

pub fn open_csv_writer<W>(writer: W) -> csv::Writer<W>
where
    W: Write,
{
    let mut builder = csv::WriterBuilder::new();
    builder
        .has_headers(false)
        .delimiter(DEFAULT_CSV_DELIMITER)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .terminator(Terminator::Any(b'\n'));
    builder.from_writer(writer)
}

//! Row-by-row Kelvin to Fahrenheit transform.
//!
//! [`ReadingSource`] consumes the header and then yields one [`Reading`] per data
//! row, lazily and in file order. [`ReadingSink`] writes the fixed output header
//! followed by converted rows. [`Pipeline`] wires the two together around the
//! converter, either over arbitrary readers/writers or over file paths.

use std::{
    io::{BufRead, BufReader, Read, Write},
    path::Path,
};

use csv::StringRecord;

use crate::{
    convert::{RoundingRule, convert_k_to_f_with},
    diagnostics::Diagnostics,
    error::BatchError,
    io_utils::{self, RawRecords},
};

pub const OUTPUT_HEADERS: [&str; 5] = ["Year", "Month", "Day", "Time", "TempF"];
pub const FIELD_COUNT: usize = 5;

/// One data row. Everything except the temperature passes through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub line: u64,
    pub year: String,
    pub month: String,
    pub day: String,
    pub time: String,
    pub kelvin: String,
}

impl Reading {
    pub fn from_record(record: &StringRecord, line: u64) -> Result<Self, BatchError> {
        if record.len() != FIELD_COUNT {
            return Err(BatchError::RowShape {
                line,
                expected: FIELD_COUNT,
                found: record.len(),
            });
        }
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();
        Ok(Self {
            line,
            year: field(0),
            month: field(1),
            day: field(2),
            time: field(3),
            kelvin: field(4),
        })
    }

    pub fn to_fahrenheit(&self, rounding: RoundingRule) -> Result<i64, BatchError> {
        convert_k_to_f_with(self.kelvin.as_str(), rounding).map_err(|source| {
            BatchError::ValueConversion {
                line: self.line,
                source,
            }
        })
    }
}

/// Single-pass source of readings. The header row is consumed on construction.
///
/// Blank lines are not skipped; they surface as rows with no fields.
pub struct ReadingSource<R: BufRead> {
    header: StringRecord,
    records: RawRecords<R>,
}

impl<R: BufRead> ReadingSource<R> {
    pub fn new(input: R) -> Result<Self, BatchError> {
        let mut records = RawRecords::new(input);
        let (_, header) = read_raw(&mut records).ok_or(BatchError::MissingHeader)??;
        Ok(Self { header, records })
    }

    /// The discarded input header, kept only for diagnostics.
    pub fn header(&self) -> &StringRecord {
        &self.header
    }
}

impl<R: BufRead> Iterator for ReadingSource<R> {
    type Item = Result<Reading, BatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        let parsed = read_raw(&mut self.records)?;
        Some(parsed.and_then(|(line, record)| Reading::from_record(&record, line)))
    }
}

fn read_raw<R: BufRead>(
    records: &mut RawRecords<R>,
) -> Option<Result<(u64, StringRecord), BatchError>> {
    let line = records.next_line();
    let raw = match records.next()? {
        Ok(raw) => raw,
        Err(err) => {
            return Some(Err(BatchError::Read {
                line,
                source: csv::Error::from(err),
            }));
        }
    };
    Some(
        io_utils::parse_record(&raw.bytes)
            .map(|record| (raw.line, record))
            .map_err(|source| BatchError::Read {
                line: raw.line,
                source,
            }),
    )
}

/// Output side of the pipeline: the fixed header, then one row per reading.
pub struct ReadingSink<W: Write> {
    writer: csv::Writer<W>,
    rows_written: usize,
}

impl<W: Write> ReadingSink<W> {
    /// Wraps `output` and writes the fixed Fahrenheit header.
    pub fn new(output: W) -> Result<Self, BatchError> {
        let mut writer = io_utils::open_csv_writer(output);
        writer
            .write_record(OUTPUT_HEADERS)
            .map_err(|source| BatchError::Write { source })?;
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    pub fn write(&mut self, reading: &Reading, fahrenheit: i64) -> Result<(), BatchError> {
        let converted = fahrenheit.to_string();
        self.writer
            .write_record([
                reading.year.as_str(),
                reading.month.as_str(),
                reading.day.as_str(),
                reading.time.as_str(),
                converted.as_str(),
            ])
            .map_err(|source| BatchError::Write { source })?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flushes buffered rows and returns the number of data rows written.
    pub fn finish(mut self) -> Result<usize, BatchError> {
        self.writer
            .flush()
            .map_err(|source| BatchError::Flush { source })?;
        Ok(self.rows_written)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
}

/// Reads Kelvin rows, converts them and writes Fahrenheit rows, tracing to the
/// supplied diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    rounding: RoundingRule,
    diagnostics: Diagnostics<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(diagnostics: Diagnostics<'a>) -> Self {
        Self {
            rounding: RoundingRule::default(),
            diagnostics,
        }
    }

    pub fn with_rounding(mut self, rounding: RoundingRule) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn rounding(&self) -> RoundingRule {
        self.rounding
    }

    /// Opens `input`, consumes its header, then creates (or truncates) `output`
    /// and streams every converted row into it.
    ///
    /// The output file is only touched once the input has been opened and its
    /// header read. A failure part-way through leaves the rows written so far.
    pub fn process_files(&self, input: &Path, output: &Path) -> Result<BatchSummary, BatchError> {
        self.diagnostics.info(format_args!(
            "Converting '{}' -> '{}' (rounding {})",
            input.display(),
            output.display(),
            self.rounding
        ));
        let reader = io_utils::open_input(input)?;
        self.diagnostics
            .info(format_args!("Opened for reading: '{}'", input.display()));
        let source = self.open_source(reader)?;

        let writer = io_utils::create_output(output)?;
        self.diagnostics
            .info(format_args!("Opened for writing: '{}'", output.display()));
        self.stream(source, writer)
    }

    /// Same as [`Pipeline::process_files`] over already-open streams.
    pub fn process_rows<R, W>(&self, input: R, output: W) -> Result<BatchSummary, BatchError>
    where
        R: Read,
        W: Write,
    {
        let source = self.open_source(BufReader::new(input))?;
        self.stream(source, output)
    }

    fn open_source<R: BufRead>(&self, input: R) -> Result<ReadingSource<R>, BatchError> {
        let source = ReadingSource::new(input)?;
        self.diagnostics.info(format_args!(
            "Skipped header row: {:?}",
            source.header().iter().collect::<Vec<_>>()
        ));
        Ok(source)
    }

    fn stream<R, W>(&self, source: ReadingSource<R>, output: W) -> Result<BatchSummary, BatchError>
    where
        R: BufRead,
        W: Write,
    {
        let mut sink = ReadingSink::new(output)?;
        for reading in source {
            let reading = reading?;
            let fahrenheit = reading.to_fahrenheit(self.rounding)?;
            self.diagnostics.debug(format_args!(
                "Line {}: converted {}K to {}F",
                reading.line, reading.kelvin, fahrenheit
            ));
            sink.write(&reading, fahrenheit)?;
        }
        let rows = sink.finish()?;
        self.diagnostics
            .info(format_args!("Wrote {rows} converted row(s)"));
        Ok(BatchSummary { rows })
    }
}

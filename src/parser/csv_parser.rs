//! Row-based parser for CSV result logs
//!
//! The first row is the header. Each later row becomes one [`Sample`], with
//! columns matched to field codes through [`crate::field_map::CSV_FIELD_NAMES`].
//! Unknown columns are ignored and short rows leave their missing fields absent.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{StringRecord, StringRecordsIntoIter};
use log::{debug, info, trace, warn};

use super::error::Result;
use super::{SampleSource, DEFAULT_INPUT_BUFFER_SIZE};
use crate::field_map::CsvColumns;
use crate::sample::Sample;

/// Parser over a CSV result log
///
/// Holds only the path; the file is opened when the first sample is pulled.
#[derive(Debug, Clone)]
pub struct CsvParser {
    path: PathBuf,
}

impl CsvParser {
    /// Create a parser for the CSV result log at `path` without touching the file
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the underlying result log
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SampleSource for CsvParser {
    type Samples = CsvSamples;

    fn http_samples(self) -> Self::Samples {
        CsvSamples {
            state: CsvState::Pending(self.path),
            yielded: 0,
        }
    }
}

enum CsvState {
    Pending(PathBuf),
    Reading {
        records: StringRecordsIntoIter<BufReader<File>>,
        columns: CsvColumns,
    },
    Done,
}

/// Lazy sequence of samples from a CSV result log
///
/// The file handle lives inside the sequence and is closed when the sequence is
/// exhausted, fails, or is dropped.
pub struct CsvSamples {
    state: CsvState,
    yielded: u64,
}

impl CsvSamples {
    /// Number of samples produced so far
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    fn next_sample(&mut self) -> Result<Option<Sample>> {
        if let CsvState::Pending(path) = &self.state {
            self.state = open_records(path)?;
        }

        let CsvState::Reading { records, columns } = &mut self.state else {
            return Ok(None);
        };

        match records.next() {
            Some(record) => Ok(Some(sample_from_record(columns, &record?))),
            None => Ok(None),
        }
    }
}

impl Iterator for CsvSamples {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, CsvState::Done) {
            return None;
        }

        match self.next_sample() {
            Ok(Some(sample)) => {
                self.yielded += 1;
                trace!("CSV sample {}: {:?}", self.yielded, sample.lb());
                Some(Ok(sample))
            }
            Ok(None) => {
                self.state = CsvState::Done;
                info!("CSV result log exhausted after {} samples", self.yielded);
                None
            }
            Err(e) => {
                self.state = CsvState::Done;
                warn!("CSV result log stopped after {} samples: {}", self.yielded, e);
                Some(Err(e))
            }
        }
    }
}

fn open_records(path: &Path) -> Result<CsvState> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(BufReader::with_capacity(DEFAULT_INPUT_BUFFER_SIZE, file));

    let columns = CsvColumns::from_headers(reader.headers()?);
    debug!(
        "CSV result log {} opened, {} recognised columns",
        path.display(),
        columns.mapped()
    );

    Ok(CsvState::Reading {
        records: reader.into_records(),
        columns,
    })
}

fn sample_from_record(columns: &CsvColumns, record: &StringRecord) -> Sample {
    Sample::from_fn(|code| columns.value(record, code).map(str::to_string))
}

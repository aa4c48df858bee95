//! # Result log parsers
//!
//! JMeter writes its result logs (JTL files) either as XML or as CSV. Both
//! forms are read lazily through the [`SampleSource`] trait, and
//! [`create_parser`] picks the right one by looking at the first line of the
//! file.
//!
//! ```rust,no_run
//! use jtl::parser::{create_parser, SampleSource};
//!
//! let parser = create_parser("results.jtl")?;
//! for sample in parser.http_samples() {
//!     let sample = sample?;
//!     println!("{:?} took {:?} ms", sample.lb(), sample.t());
//! }
//! # Ok::<(), jtl::JtlError>(())
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;
use serde::Serialize;

mod csv_parser;
mod error;
mod xml_parser;

pub use csv_parser::{CsvParser, CsvSamples};
pub use error::{JtlError, Result};
pub use xml_parser::{XmlParser, XmlSamples};

use crate::sample::Sample;

/// Read buffer capacity used when opening result logs (64 KiB)
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

/// Prefix of the first line that marks a result log as XML
pub const XML_DECLARATION_PREFIX: &[u8] = b"<?xml";

/// Anything that can produce HTTP samples from a result log
///
/// Sequences are single-pass: producing them consumes the parser.
pub trait SampleSource {
    /// The lazy sequence of samples
    type Samples: Iterator<Item = Result<Sample>>;

    /// Start producing samples
    fn http_samples(self) -> Self::Samples;
}

/// On-disk form of a result log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JtlFormat {
    /// Streaming XML (`<testResults>` with `httpSample` elements)
    Xml,
    /// CSV with a header row
    Csv,
}

impl JtlFormat {
    /// Classify a result log from its first line
    pub fn from_first_line(line: &[u8]) -> Self {
        if line.starts_with(XML_DECLARATION_PREFIX) {
            JtlFormat::Xml
        } else {
            JtlFormat::Csv
        }
    }
}

impl fmt::Display for JtlFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JtlFormat::Xml => f.write_str("XML"),
            JtlFormat::Csv => f.write_str("CSV"),
        }
    }
}

/// Detect the format of the result log at `path` from the start of its first line
///
/// Only the first few bytes are read, so a log without line breaks is never
/// buffered in full.
pub fn detect_format<P: AsRef<Path>>(path: P) -> Result<JtlFormat> {
    let prefix = read_prefix(File::open(path.as_ref())?)?;
    Ok(JtlFormat::from_first_line(&prefix))
}

fn read_prefix<R: Read>(reader: R) -> Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(XML_DECLARATION_PREFIX.len());
    reader
        .take(XML_DECLARATION_PREFIX.len() as u64)
        .read_to_end(&mut prefix)?;
    Ok(prefix)
}

/// Detect the format of the result log at `path` and create a matching parser
///
/// The file is opened once for detection and closed again; the XML parser then
/// opens it on its own, the CSV parser only when samples are pulled.
pub fn create_parser<P: AsRef<Path>>(path: P) -> Result<JtlParser> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    debug!("Detected {} result log: {}", format, path.display());

    match format {
        JtlFormat::Xml => Ok(JtlParser::Xml(XmlParser::open(path)?)),
        JtlFormat::Csv => Ok(JtlParser::Csv(CsvParser::new(path))),
    }
}

/// Parser chosen by [`create_parser`]
pub enum JtlParser {
    /// XML result log
    Xml(XmlParser<BufReader<File>>),
    /// CSV result log
    Csv(CsvParser),
}

impl JtlParser {
    /// Format of the underlying result log
    pub fn format(&self) -> JtlFormat {
        match self {
            JtlParser::Xml(_) => JtlFormat::Xml,
            JtlParser::Csv(_) => JtlFormat::Csv,
        }
    }

    /// Version attribute of an XML result log; CSV logs carry none
    pub fn version(&self) -> Option<&str> {
        match self {
            JtlParser::Xml(parser) => parser.version(),
            JtlParser::Csv(_) => None,
        }
    }
}

impl SampleSource for JtlParser {
    type Samples = HttpSamples;

    fn http_samples(self) -> Self::Samples {
        match self {
            JtlParser::Xml(parser) => HttpSamples::Xml(parser.http_samples()),
            JtlParser::Csv(parser) => HttpSamples::Csv(parser.http_samples()),
        }
    }
}

/// Lazy sequence of samples from either result log form
pub enum HttpSamples {
    /// Samples from an XML result log
    Xml(XmlSamples<BufReader<File>>),
    /// Samples from a CSV result log
    Csv(CsvSamples),
}

impl Iterator for HttpSamples {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            HttpSamples::Xml(samples) => samples.next(),
            HttpSamples::Csv(samples) => samples.next(),
        }
    }
}

//! # jtl - JMeter Result Log Parser
//!
//! `jtl` reads JMeter test result logs ("JTL" files) and exposes them as a lazy
//! sequence of [`Sample`] records, whichever on-disk form the log uses.
//!
//! ## Key Features
//!
//! - **Format detection**: a log whose first line starts with `<?xml` is read as
//!   XML, anything else as CSV.
//!
//! - **Streaming**: both forms are pulled one sample at a time, so logs far
//!   larger than memory can be processed.
//!
//! - **Uniform records**: every sample has the same 17 fields, named by
//!   JMeter's short attribute codes (`t`, `lt`, `ts`, `s`, `lb`, `rc`, ...).
//!   Fields the source does not carry are `None`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jtl::{create_parser, SampleSource};
//!
//! let parser = create_parser("results.jtl")?;
//! println!("format: {}, version: {:?}", parser.format(), parser.version());
//!
//! for sample in parser.http_samples() {
//!     let sample = sample?;
//!     if sample.s() == Some("false") {
//!         println!("{:?} failed with {:?}", sample.lb(), sample.rc());
//!     }
//! }
//! # Ok::<(), jtl::JtlError>(())
//! ```
//!
//! ## Field Codes
//!
//! | Code | Meaning | CSV column |
//! |------|---------|------------|
//! | by | bytes received | bytes |
//! | de | data encoding | - |
//! | dt | data type | dataType |
//! | ec | error count | - |
//! | hn | hostname | - |
//! | it | idle time (ms) | - |
//! | lb | label | label |
//! | lt | latency (ms) | Latency |
//! | na | active threads (all groups) | - |
//! | ng | active threads (this group) | - |
//! | rc | response code | responseCode |
//! | rm | response message | responseMessage |
//! | s | success flag | success |
//! | sc | sample count | - |
//! | t | elapsed time (ms) | elapsed |
//! | tn | thread name | threadName |
//! | ts | timestamp (ms since epoch) | timeStamp |
//!
//! ## Architecture
//!
//! - [`sample`]: the [`Sample`] record and [`FieldCode`] enumeration
//! - [`field_map`]: field code to CSV column header table
//! - [`parser`]: format detection, the [`SampleSource`] trait and both parsers

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod field_map;
pub mod parser;
pub mod sample;

pub use field_map::CSV_FIELD_NAMES;
pub use parser::{
    create_parser, detect_format, CsvParser, HttpSamples, JtlError, JtlFormat, JtlParser,
    SampleSource, XmlParser,
};
pub use sample::{FieldCode, Sample, UnknownFieldCode};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::parser::{create_parser, JtlError, JtlFormat, JtlParser, SampleSource};
    pub use crate::sample::{FieldCode, Sample};
}

//! Mapping between sample field codes and CSV column headers
//!
//! CSV result logs name their columns with long headers (`elapsed`,
//! `responseCode`, ...). Seven of the short codes have no CSV column and are
//! always absent when reading that form.

use csv::StringRecord;

use crate::sample::FieldCode;

/// CSV column header for every field code, in canonical order
pub const CSV_FIELD_NAMES: [(FieldCode, Option<&str>); FieldCode::COUNT] = [
    (FieldCode::By, Some("bytes")),
    (FieldCode::De, None),
    (FieldCode::Dt, Some("dataType")),
    (FieldCode::Ec, None),
    (FieldCode::Hn, None),
    (FieldCode::It, None),
    (FieldCode::Lb, Some("label")),
    (FieldCode::Lt, Some("Latency")),
    (FieldCode::Na, None),
    (FieldCode::Ng, None),
    (FieldCode::Rc, Some("responseCode")),
    (FieldCode::Rm, Some("responseMessage")),
    (FieldCode::S, Some("success")),
    (FieldCode::Sc, None),
    (FieldCode::T, Some("elapsed")),
    (FieldCode::Tn, Some("threadName")),
    (FieldCode::Ts, Some("timeStamp")),
];

impl FieldCode {
    /// CSV column header for this field, or `None` if CSV logs never carry it
    pub const fn csv_header(self) -> Option<&'static str> {
        CSV_FIELD_NAMES[self.index()].1
    }
}

/// Column position of each field within one CSV file, resolved from its header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CsvColumns {
    positions: [Option<usize>; FieldCode::COUNT],
}

impl CsvColumns {
    /// Resolve column positions; when a header repeats, the last occurrence wins
    pub(crate) fn from_headers(headers: &StringRecord) -> Self {
        let mut positions = [None; FieldCode::COUNT];
        for (code, header) in CSV_FIELD_NAMES {
            if let Some(header) = header {
                positions[code.index()] = headers
                    .iter()
                    .enumerate()
                    .filter(|(_, h)| *h == header)
                    .map(|(i, _)| i)
                    .last();
            }
        }
        Self { positions }
    }

    /// Number of recognised columns present in the header
    pub(crate) fn mapped(&self) -> usize {
        self.positions.iter().filter(|p| p.is_some()).count()
    }

    /// Value of `code` in `record`; absent if unmapped or if the row is too short
    pub(crate) fn value<'r>(&self, record: &'r StringRecord, code: FieldCode) -> Option<&'r str> {
        record.get(self.positions[code.index()]?)
    }
}

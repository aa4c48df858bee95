//! The sample record shared by both result log formats
//!
//! JMeter identifies every sample attribute by a short code (`t` for elapsed
//! time, `rc` for response code, ...). The XML form uses these codes directly
//! as attribute names; the CSV form uses long column headers that are mapped
//! back onto the codes (see [`crate::field_map`]).

use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Short code identifying one of the 17 sample fields
///
/// The declaration order is the canonical field order of a [`Sample`] and is
/// part of the public contract for positional access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldCode {
    /// `by`: bytes received
    By,
    /// `de`: data encoding
    De,
    /// `dt`: data type
    Dt,
    /// `ec`: error count (0 or 1, unless multiple samples are aggregated)
    Ec,
    /// `hn`: hostname where the sample was generated
    Hn,
    /// `it`: idle time in milliseconds
    It,
    /// `lb`: label
    Lb,
    /// `lt`: latency to first response in milliseconds
    Lt,
    /// `na`: active threads for all thread groups
    Na,
    /// `ng`: active threads in this group
    Ng,
    /// `rc`: response code (e.g. 200)
    Rc,
    /// `rm`: response message (e.g. OK)
    Rm,
    /// `s`: success flag (true/false)
    S,
    /// `sc`: sample count (1, unless multiple samples are aggregated)
    Sc,
    /// `t`: elapsed time in milliseconds
    T,
    /// `tn`: thread name
    Tn,
    /// `ts`: timestamp in milliseconds since the Unix epoch
    Ts,
}

impl FieldCode {
    /// Number of fields in every sample
    pub const COUNT: usize = 17;

    /// All field codes in canonical order
    pub const ALL: [FieldCode; FieldCode::COUNT] = [
        FieldCode::By,
        FieldCode::De,
        FieldCode::Dt,
        FieldCode::Ec,
        FieldCode::Hn,
        FieldCode::It,
        FieldCode::Lb,
        FieldCode::Lt,
        FieldCode::Na,
        FieldCode::Ng,
        FieldCode::Rc,
        FieldCode::Rm,
        FieldCode::S,
        FieldCode::Sc,
        FieldCode::T,
        FieldCode::Tn,
        FieldCode::Ts,
    ];

    /// Position of this field in the canonical order
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The short code as written in XML result logs
    pub const fn code(self) -> &'static str {
        match self {
            FieldCode::By => "by",
            FieldCode::De => "de",
            FieldCode::Dt => "dt",
            FieldCode::Ec => "ec",
            FieldCode::Hn => "hn",
            FieldCode::It => "it",
            FieldCode::Lb => "lb",
            FieldCode::Lt => "lt",
            FieldCode::Na => "na",
            FieldCode::Ng => "ng",
            FieldCode::Rc => "rc",
            FieldCode::Rm => "rm",
            FieldCode::S => "s",
            FieldCode::Sc => "sc",
            FieldCode::T => "t",
            FieldCode::Tn => "tn",
            FieldCode::Ts => "ts",
        }
    }

    /// Human-readable meaning of the field
    pub const fn description(self) -> &'static str {
        match self {
            FieldCode::By => "bytes received",
            FieldCode::De => "data encoding",
            FieldCode::Dt => "data type",
            FieldCode::Ec => "error count",
            FieldCode::Hn => "hostname",
            FieldCode::It => "idle time (ms)",
            FieldCode::Lb => "label",
            FieldCode::Lt => "latency (ms)",
            FieldCode::Na => "active threads (all groups)",
            FieldCode::Ng => "active threads (this group)",
            FieldCode::Rc => "response code",
            FieldCode::Rm => "response message",
            FieldCode::S => "success flag",
            FieldCode::Sc => "sample count",
            FieldCode::T => "elapsed time (ms)",
            FieldCode::Tn => "thread name",
            FieldCode::Ts => "timestamp (ms since epoch)",
        }
    }

    /// Look up a field by its short code given as raw bytes (XML attribute names)
    pub fn from_bytes(code: &[u8]) -> Option<Self> {
        let field = match code {
            b"by" => FieldCode::By,
            b"de" => FieldCode::De,
            b"dt" => FieldCode::Dt,
            b"ec" => FieldCode::Ec,
            b"hn" => FieldCode::Hn,
            b"it" => FieldCode::It,
            b"lb" => FieldCode::Lb,
            b"lt" => FieldCode::Lt,
            b"na" => FieldCode::Na,
            b"ng" => FieldCode::Ng,
            b"rc" => FieldCode::Rc,
            b"rm" => FieldCode::Rm,
            b"s" => FieldCode::S,
            b"sc" => FieldCode::Sc,
            b"t" => FieldCode::T,
            b"tn" => FieldCode::Tn,
            b"ts" => FieldCode::Ts,
            _ => return None,
        };
        Some(field)
    }
}

impl fmt::Display for FieldCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unknown short code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sample field code: {0:?}")]
pub struct UnknownFieldCode(pub String);

impl FromStr for FieldCode {
    type Err = UnknownFieldCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldCode::from_bytes(s.trim().as_bytes()).ok_or_else(|| UnknownFieldCode(s.to_string()))
    }
}

/// One HTTP sample from a JMeter result log
///
/// Every sample carries all 17 fields. A field is `None` when the source
/// record has no value for it, which is distinct from `Some("")` (an empty
/// attribute or an empty CSV cell). Samples cannot be modified once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Sample {
    values: [Option<String>; FieldCode::COUNT],
}

impl Sample {
    /// Build a sample by asking `value_of` for each field in canonical order
    pub fn from_fn<F>(mut value_of: F) -> Self
    where
        F: FnMut(FieldCode) -> Option<String>,
    {
        Self {
            values: FieldCode::ALL.map(&mut value_of),
        }
    }

    pub(crate) fn from_values(values: [Option<String>; FieldCode::COUNT]) -> Self {
        Self { values }
    }

    /// Value of a field, or `None` if absent
    pub fn get(&self, code: FieldCode) -> Option<&str> {
        self.values[code.index()].as_deref()
    }

    /// Value at a canonical position (0..17)
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.values.get(index)?.as_deref()
    }

    /// All fields with their values, in canonical order
    pub fn fields(&self) -> impl ExactSizeIterator<Item = (FieldCode, Option<&str>)> + '_ {
        FieldCode::ALL
            .iter()
            .zip(self.values.iter())
            .map(|(code, value)| (*code, value.as_deref()))
    }

    /// Consume the sample, returning the values in canonical order
    pub fn into_values(self) -> [Option<String>; FieldCode::COUNT] {
        self.values
    }

    /// Bytes received
    pub fn by(&self) -> Option<&str> {
        self.get(FieldCode::By)
    }

    /// Data encoding
    pub fn de(&self) -> Option<&str> {
        self.get(FieldCode::De)
    }

    /// Data type
    pub fn dt(&self) -> Option<&str> {
        self.get(FieldCode::Dt)
    }

    /// Error count
    pub fn ec(&self) -> Option<&str> {
        self.get(FieldCode::Ec)
    }

    /// Hostname
    pub fn hn(&self) -> Option<&str> {
        self.get(FieldCode::Hn)
    }

    /// Idle time (ms)
    pub fn it(&self) -> Option<&str> {
        self.get(FieldCode::It)
    }

    /// Label
    pub fn lb(&self) -> Option<&str> {
        self.get(FieldCode::Lb)
    }

    /// Latency to first response (ms)
    pub fn lt(&self) -> Option<&str> {
        self.get(FieldCode::Lt)
    }

    /// Active threads across all groups
    pub fn na(&self) -> Option<&str> {
        self.get(FieldCode::Na)
    }

    /// Active threads in this group
    pub fn ng(&self) -> Option<&str> {
        self.get(FieldCode::Ng)
    }

    /// Response code
    pub fn rc(&self) -> Option<&str> {
        self.get(FieldCode::Rc)
    }

    /// Response message
    pub fn rm(&self) -> Option<&str> {
        self.get(FieldCode::Rm)
    }

    /// Success flag
    pub fn s(&self) -> Option<&str> {
        self.get(FieldCode::S)
    }

    /// Sample count
    pub fn sc(&self) -> Option<&str> {
        self.get(FieldCode::Sc)
    }

    /// Elapsed time (ms)
    pub fn t(&self) -> Option<&str> {
        self.get(FieldCode::T)
    }

    /// Thread name
    pub fn tn(&self) -> Option<&str> {
        self.get(FieldCode::Tn)
    }

    /// Timestamp (ms since epoch)
    pub fn ts(&self) -> Option<&str> {
        self.get(FieldCode::Ts)
    }
}

/// Serializes as a map keyed by short code, in canonical order; absent fields become `null`
impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FieldCode::COUNT))?;
        for (code, value) in self.fields() {
            map.serialize_entry(code.code(), &value)?;
        }
        map.end()
    }
}

//! Streaming parser for XML result logs
//!
//! XML logs have a `testResults` (or any other) root element carrying a
//! `version` attribute, followed by one element per sample. Only
//! `httpSample` elements are turned into [`Sample`]s; everything else drives
//! the pull parser forward and is dropped.
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <testResults version="1.2">
//!   <httpSample t="120" lt="80" ts="1700000000000" s="true" lb="Home" rc="200" .../>
//!   <httpSample t="95" ...>
//!     <httpSample t="40" .../>   <!-- redirect sub-result -->
//!   </httpSample>
//!   <sample t="12" lb="JDBC" .../>
//! </testResults>
//! ```
//!
//! The reader never builds a tree. The event buffer is cleared after every
//! event, so memory is bounded by the largest single tag plus the attributes of
//! the `httpSample` elements that are currently open.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, trace, warn};
use quick_xml::encoding::Decoder;
use quick_xml::escape::unescape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::error::{JtlError, Result};
use super::{SampleSource, DEFAULT_INPUT_BUFFER_SIZE};
use crate::sample::{FieldCode, Sample};

const HTTP_SAMPLE_TAG: &[u8] = b"httpSample";

/// Pull parser over an XML result log
///
/// Construction reads up to the root element so that [`XmlParser::version`]
/// is available before any sample is pulled.
pub struct XmlParser<R: BufRead> {
    reader: Reader<R>,
    version: Option<String>,
    depth: usize,
}

impl XmlParser<BufReader<File>> {
    /// Open an XML result log for streaming
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::with_capacity(DEFAULT_INPUT_BUFFER_SIZE, file);
        Self::new(reader)
    }
}

impl<R: BufRead> XmlParser<R> {
    /// Create a parser from a buffered byte stream and consume its root element
    pub fn new(reader: R) -> Result<Self> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let (version, depth) = loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    break (read_attribute(e, b"version", xml_reader.decoder())?, 1);
                }
                Event::Empty(ref e) => {
                    break (read_attribute(e, b"version", xml_reader.decoder())?, 0);
                }
                Event::Text(ref e) => check_outside_root(e)?,
                Event::CData(_) => return Err(content_outside_root("a CDATA section")),
                Event::Eof => {
                    return Err(JtlError::InvalidStructure(
                        "document has no root element".to_string(),
                    ));
                }
                _ => {}
            }
            buf.clear();
        };

        debug!("XML result log root parsed, version {:?}", version);

        Ok(Self {
            reader: xml_reader,
            version,
            depth,
        })
    }

    /// The root element's `version` attribute
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl<R: BufRead> SampleSource for XmlParser<R> {
    type Samples = XmlSamples<R>;

    fn http_samples(self) -> Self::Samples {
        XmlSamples {
            parser: self,
            buf: Vec::new(),
            open_samples: Vec::new(),
            yielded: 0,
            finished: false,
        }
    }
}

/// Lazy sequence of samples from an XML result log
///
/// Samples come out in element-end order, so a nested `httpSample` is yielded
/// before the sample that contains it. The sequence ends for good after the
/// first error.
pub struct XmlSamples<R: BufRead> {
    parser: XmlParser<R>,
    buf: Vec<u8>,
    open_samples: Vec<Sample>,
    yielded: u64,
    finished: bool,
}

impl<R: BufRead> XmlSamples<R> {
    /// Root `version` attribute of the underlying document
    pub fn version(&self) -> Option<&str> {
        self.parser.version()
    }

    /// Number of samples produced so far
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    fn next_sample(&mut self) -> Result<Option<Sample>> {
        loop {
            let decoder = self.parser.reader.decoder();
            let sample = match self.parser.reader.read_event_into(&mut self.buf)? {
                Event::Start(ref e) => {
                    enter_element(&mut self.parser.depth)?;
                    if e.name().as_ref() == HTTP_SAMPLE_TAG {
                        self.open_samples.push(sample_from_element(e, decoder)?);
                    }
                    None
                }
                Event::Empty(ref e) => {
                    enter_element(&mut self.parser.depth)?;
                    self.parser.depth -= 1;
                    if e.name().as_ref() == HTTP_SAMPLE_TAG {
                        Some(sample_from_element(e, decoder)?)
                    } else {
                        None
                    }
                }
                Event::End(ref e) => {
                    self.parser.depth = self.parser.depth.saturating_sub(1);
                    if e.name().as_ref() == HTTP_SAMPLE_TAG {
                        self.open_samples.pop()
                    } else {
                        None
                    }
                }
                Event::Text(ref e) if self.parser.depth == 0 => {
                    check_outside_root(e)?;
                    None
                }
                Event::CData(_) if self.parser.depth == 0 => {
                    return Err(content_outside_root("a CDATA section"));
                }
                Event::Eof => {
                    if self.parser.depth > 0 {
                        return Err(JtlError::InvalidStructure(format!(
                            "unexpected end of document with {} unclosed element(s)",
                            self.parser.depth
                        )));
                    }
                    return Ok(None);
                }
                _ => None,
            };
            self.buf.clear();

            if sample.is_some() {
                return Ok(sample);
            }
        }
    }
}

impl<R: BufRead> Iterator for XmlSamples<R> {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_sample() {
            Ok(Some(sample)) => {
                self.yielded += 1;
                trace!("XML sample {}: {:?}", self.yielded, sample.lb());
                Some(Ok(sample))
            }
            Ok(None) => {
                self.finished = true;
                info!("XML result log exhausted after {} samples", self.yielded);
                None
            }
            Err(e) => {
                self.finished = true;
                warn!("XML result log stopped after {} samples: {}", self.yielded, e);
                Some(Err(e))
            }
        }
    }
}

fn enter_element(depth: &mut usize) -> Result<()> {
    if *depth == 0 {
        return Err(JtlError::InvalidStructure(
            "element found after the document root was closed".to_string(),
        ));
    }
    *depth += 1;
    Ok(())
}

/// Only whitespace may appear before or after the root element
fn check_outside_root(text: &[u8]) -> Result<()> {
    if text.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }
    let preview = String::from_utf8_lossy(&text[..text.len().min(32)]);
    Err(content_outside_root(&format!("text {:?}", preview)))
}

fn content_outside_root(what: &str) -> JtlError {
    JtlError::InvalidStructure(format!("{} found outside the root element", what))
}

/// Build a sample from the short-code attributes of an `httpSample` element
fn sample_from_element(e: &BytesStart, decoder: Decoder) -> Result<Sample> {
    let mut values: [Option<String>; FieldCode::COUNT] = Default::default();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if let Some(code) = FieldCode::from_bytes(attr.key.as_ref()) {
            values[code.index()] = Some(attribute_value(&attr, decoder)?);
        }
    }
    Ok(Sample::from_values(values))
}

fn read_attribute(e: &BytesStart, name: &[u8], decoder: Decoder) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == name {
            return Ok(Some(attribute_value(&attr, decoder)?));
        }
    }
    Ok(None)
}

/// Decode an attribute value the way an XML processor reports it
///
/// Literal tabs and line breaks become spaces before entity references are
/// expanded, so `&#10;` still yields a newline.
fn attribute_value(attr: &Attribute, decoder: Decoder) -> Result<String> {
    let raw = decoder.decode(&attr.value).map_err(quick_xml::Error::from)?;
    let normalized = normalize_attribute_whitespace(&raw);
    let value = unescape(&normalized).map_err(quick_xml::Error::from)?;
    Ok(value.into_owned())
}

fn normalize_attribute_whitespace(raw: &str) -> Cow<'_, str> {
    let is_break = |c: char| matches!(c, '\t' | '\n' | '\r');
    if !raw.contains(is_break) {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(raw.replace("\r\n", " ").replace(is_break, " "))
}

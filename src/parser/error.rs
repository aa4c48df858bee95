/// Errors that can occur while detecting or reading a result log
#[derive(Debug, thiserror::Error)]
pub enum JtlError {
    /// The source could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed XML result log
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed CSV result log
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Well-formed tokens that do not make up a result log document
    #[error("Invalid JTL structure: {0}")]
    InvalidStructure(String),
}

/// Result alias used throughout the parsers
pub type Result<T> = std::result::Result<T, JtlError>;

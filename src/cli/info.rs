use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};

use jtl::{create_parser, FieldCode, JtlFormat, SampleSource};

/// Summary of a result log gathered in one streaming pass
#[derive(Debug)]
pub struct LogSummary {
    file: PathBuf,
    format: JtlFormat,
    version: Option<String>,
    samples: u64,
    populated: Vec<FieldCode>,
}

impl LogSummary {
    /// Read the whole log once, counting samples and the fields that carry values
    pub fn collect(file: &Path) -> Result<Self> {
        let parser = create_parser(file)
            .with_context(|| format!("Failed to open result log: {}", file.display()))?;
        let format = parser.format();
        let version = parser.version().map(str::to_string);

        let mut samples = 0u64;
        let mut seen = [false; FieldCode::COUNT];
        for sample in parser.http_samples() {
            let sample =
                sample.with_context(|| format!("Failed to read sample {}", samples + 1))?;
            for (code, value) in sample.fields() {
                seen[code.index()] |= value.is_some();
            }
            samples += 1;
        }

        let populated = FieldCode::ALL
            .into_iter()
            .filter(|code| seen[code.index()])
            .collect();

        Ok(Self {
            file: file.to_path_buf(),
            format,
            version,
            samples,
            populated,
        })
    }

    fn populated_codes(&self) -> String {
        if self.populated.is_empty() {
            return "-".to_string();
        }
        self.populated
            .iter()
            .map(|code| code.code())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Format the summary with colors (requires console feature)
    #[cfg(feature = "colorized_output")]
    pub fn format_colored(&self) -> String {
        use console::style;

        let mut output = String::new();
        output.push_str(&format!("{}\n", style("JTL Result Log").bold().cyan()));
        output.push_str(&format!("{}\n", style("==============").cyan()));
        output.push_str(&format!("{}: {}\n", style("File").bold(), self.file.display()));
        output.push_str(&format!("{}: {}\n", style("Format").bold(), self.format));
        output.push_str(&format!(
            "{}: {}\n",
            style("Version").bold(),
            self.version.as_deref().unwrap_or("-")
        ));
        output.push_str(&format!(
            "{}: {}\n",
            style("Samples").bold(),
            style(self.samples).green()
        ));
        output.push_str(&format!(
            "{}: {}",
            style("Populated fields").bold(),
            self.populated_codes()
        ));
        output
    }
}

impl fmt::Display for LogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "JTL Result Log")?;
        writeln!(f, "==============")?;
        writeln!(f, "File: {}", self.file.display())?;
        writeln!(f, "Format: {}", self.format)?;
        writeln!(f, "Version: {}", self.version.as_deref().unwrap_or("-"))?;
        writeln!(f, "Samples: {}", self.samples)?;
        write!(f, "Populated fields: {}", self.populated_codes())
    }
}

/// Display information about a result log
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let summary = LogSummary::collect(&file)?;

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", summary.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", summary);
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::info;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use jtl::{create_parser, FieldCode, Sample, SampleSource};

use super::config::Config;

/// Output format for dumped samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line, absent fields as null
    #[default]
    Json,
    /// Tab-separated values with a short-code header, absent fields empty
    Tsv,
}

/// Print the samples of a result log to stdout
pub fn run(
    file: PathBuf,
    output: Option<OutputFormat>,
    limit: Option<usize>,
    fields: Option<Vec<FieldCode>>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = match config {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };

    let output = output.or(config.dump.output).unwrap_or_default();
    let limit = limit.or(config.dump.limit).unwrap_or(usize::MAX);
    let fields = match fields {
        Some(fields) => fields,
        None => match config.dump.fields {
            Some(codes) => parse_field_codes(&codes)?,
            None => FieldCode::ALL.to_vec(),
        },
    };

    let parser = create_parser(&file)
        .with_context(|| format!("Failed to open result log: {}", file.display()))?;
    info!("Dumping {} result log {}", parser.format(), file.display());

    let stdout = io::stdout();
    let written = write_samples(
        stdout.lock(),
        parser.http_samples().take(limit),
        &fields,
        output,
    )?;
    info!("Wrote {} samples", written);

    Ok(())
}

fn parse_field_codes(codes: &[String]) -> Result<Vec<FieldCode>> {
    codes
        .iter()
        .map(|code| code.parse::<FieldCode>().context("Invalid field in config file"))
        .collect()
}

/// Write samples in the requested format, returning how many were written
pub fn write_samples<W, I>(
    out: W,
    samples: I,
    fields: &[FieldCode],
    output: OutputFormat,
) -> Result<usize>
where
    W: Write,
    I: Iterator<Item = jtl::parser::Result<Sample>>,
{
    let mut count = 0;
    match output {
        OutputFormat::Json => {
            let mut out = BufWriter::new(out);
            for sample in samples {
                let sample =
                    sample.with_context(|| format!("Failed to read sample {}", count + 1))?;
                serde_json::to_writer(&mut out, &SelectedFields { sample: &sample, fields })?;
                out.write_all(b"\n")?;
                count += 1;
            }
            out.flush()?;
        }
        OutputFormat::Tsv => {
            let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(out);
            writer.write_record(fields.iter().map(|code| code.code()))?;
            for sample in samples {
                let sample =
                    sample.with_context(|| format!("Failed to read sample {}", count + 1))?;
                writer.write_record(fields.iter().map(|code| sample.get(*code).unwrap_or("")))?;
                count += 1;
            }
            writer.flush()?;
        }
    }
    Ok(count)
}

/// A sample restricted to a subset of fields, serialized in the given order
struct SelectedFields<'a> {
    sample: &'a Sample,
    fields: &'a [FieldCode],
}

impl Serialize for SelectedFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for code in self.fields {
            map.serialize_entry(code.code(), &self.sample.get(*code))?;
        }
        map.end()
    }
}

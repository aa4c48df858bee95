//! Property tests for the sample mapping of both result log forms

use jtl::{FieldCode, Sample, SampleSource, XmlParser, CSV_FIELD_NAMES};
use proptest::prelude::*;
use std::io::Cursor;

fn value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._:/-]{0,12}"
}

/// One optional value per field code
fn attributes() -> impl Strategy<Value = Vec<Option<String>>> {
    prop::collection::vec(prop::option::of(value()), FieldCode::COUNT)
}

fn xml_document(elements: &[Vec<Option<String>>]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<testResults version=\"1.2\">\n");
    for attrs in elements {
        xml.push_str("<httpSample");
        for (code, value) in FieldCode::ALL.iter().zip(attrs) {
            if let Some(value) = value {
                xml.push_str(&format!(" {}=\"{}\"", code, value));
            }
        }
        xml.push_str("/>\n<sample t=\"0\" lb=\"ignored\"/>\n");
    }
    xml.push_str("</testResults>\n");
    xml
}

proptest! {
    /// Every httpSample element yields exactly one sample with its attributes verbatim
    #[test]
    fn test_xml_elements_map_to_samples(elements in prop::collection::vec(attributes(), 0..40)) {
        let xml = xml_document(&elements);
        let parser = XmlParser::new(Cursor::new(xml.into_bytes())).unwrap();
        let samples: Vec<Sample> = parser.http_samples().collect::<Result<_, _>>().unwrap();

        prop_assert_eq!(samples.len(), elements.len());
        for (sample, attrs) in samples.iter().zip(&elements) {
            prop_assert_eq!(sample.fields().len(), FieldCode::COUNT);
            for (code, expected) in FieldCode::ALL.iter().zip(attrs) {
                prop_assert_eq!(sample.get(*code), expected.as_deref());
            }
        }
    }

    /// Every CSV data row yields one sample; unmapped fields are always absent
    #[test]
    fn test_csv_rows_map_to_samples(
        columns in prop::sample::subsequence(
            CSV_FIELD_NAMES
                .iter()
                .filter_map(|(code, header)| header.map(|h| (*code, h)))
                .collect::<Vec<_>>(),
            1..=10,
        ),
        rows in prop::collection::vec(prop::collection::vec(value(), 11), 0..30),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("props.csv");
        {
            let mut writer = csv::Writer::from_path(&path).unwrap();
            let mut header: Vec<&str> = columns.iter().map(|(_, h)| *h).collect();
            header.push("URL");
            writer.write_record(&header).unwrap();
            for row in &rows {
                let mut record: Vec<&str> =
                    row[..columns.len()].iter().map(String::as_str).collect();
                record.push(&row[10]);
                writer.write_record(&record).unwrap();
            }
            writer.flush().unwrap();
        }

        let samples: Vec<Sample> = jtl::create_parser(&path)
            .unwrap()
            .http_samples()
            .collect::<Result<_, _>>()
            .unwrap();

        prop_assert_eq!(samples.len(), rows.len());
        for (sample, row) in samples.iter().zip(&rows) {
            for code in FieldCode::ALL {
                let expected = columns
                    .iter()
                    .position(|(c, _)| *c == code)
                    .map(|i| row[i].as_str());
                prop_assert_eq!(sample.get(code), expected);
            }
        }
    }
}

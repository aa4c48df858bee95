//! Integration tests for jtl
//!
//! These tests go through format detection and both parsers on real files.

use jtl::{create_parser, FieldCode, JtlError, JtlFormat, Sample, SampleSource};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::tempdir;

const CSV_ONLY_ABSENT: [FieldCode; 7] = [
    FieldCode::De,
    FieldCode::Ec,
    FieldCode::Hn,
    FieldCode::It,
    FieldCode::Na,
    FieldCode::Ng,
    FieldCode::Sc,
];

fn write(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

fn read_all(path: &Path) -> Vec<Sample> {
    create_parser(path)
        .unwrap()
        .http_samples()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn populated(sample: &Sample) -> Vec<FieldCode> {
    sample
        .fields()
        .filter(|(_, value)| value.is_some())
        .map(|(code, _)| code)
        .collect()
}

#[test]
fn test_xml_scenario_single_sample() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("single.jtl");
    write(
        &path,
        concat!(
            "<?xml version=\"1.0\"?>\n",
            "<results version=\"1\"><httpSample t=\"120\" s=\"true\" lb=\"Home\"/></results>",
        ),
    );

    let samples = read_all(&path);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].t(), Some("120"));
    assert_eq!(samples[0].s(), Some("true"));
    assert_eq!(samples[0].lb(), Some("Home"));
    assert_eq!(populated(&samples[0]), vec![FieldCode::Lb, FieldCode::S, FieldCode::T]);
}

#[test]
fn test_csv_scenario_single_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("single.csv");
    write(&path, "elapsed,success,label\n120,true,Home\n");

    let samples = read_all(&path);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].t(), Some("120"));
    assert_eq!(samples[0].s(), Some("true"));
    assert_eq!(samples[0].lb(), Some("Home"));
    for code in CSV_ONLY_ABSENT {
        assert_eq!(samples[0].get(code), None, "{} should be absent", code);
    }
    assert_eq!(populated(&samples[0]).len(), 3);
}

#[test]
fn test_empty_xml_results() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.jtl");
    write(&path, "<?xml version=\"1.0\"?>\n<results version=\"1\"/>");

    let parser = create_parser(&path).unwrap();
    assert_eq!(parser.format(), JtlFormat::Xml);
    assert_eq!(parser.version(), Some("1"));
    assert_eq!(parser.http_samples().count(), 0);
}

#[test]
fn test_csv_header_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("header.csv");
    write(&path, "timeStamp,elapsed,label,responseCode\n");

    assert_eq!(read_all(&path).len(), 0);
}

#[test]
fn test_xml_without_declaration_is_read_as_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no_decl.jtl");
    write(&path, "<results version=\"1\"><httpSample t=\"1\"/></results>\n");

    let parser = create_parser(&path).unwrap();
    assert_eq!(parser.format(), JtlFormat::Csv);
}

#[test]
fn test_full_jmeter_csv_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("jmeter.csv");
    write(
        &path,
        "timeStamp,elapsed,label,responseCode,responseMessage,threadName,dataType,success,failureMessage,bytes,sentBytes,grpThreads,allThreads,URL,Latency,IdleTime,Connect\n\
         1700000000000,120,Home,200,OK,Users 1-1,text,true,,5120,230,1,1,http://example.com/,80,0,12\n\
         1700000000150,340,\"Login, POST\",500,Internal Server Error,Users 1-2,text,false,boom,90,410,2,2,http://example.com/login,300,0,15\n",
    );

    let samples = read_all(&path);
    assert_eq!(samples.len(), 2);

    let home = &samples[0];
    assert_eq!(home.ts(), Some("1700000000000"));
    assert_eq!(home.t(), Some("120"));
    assert_eq!(home.lb(), Some("Home"));
    assert_eq!(home.rc(), Some("200"));
    assert_eq!(home.rm(), Some("OK"));
    assert_eq!(home.tn(), Some("Users 1-1"));
    assert_eq!(home.dt(), Some("text"));
    assert_eq!(home.s(), Some("true"));
    assert_eq!(home.by(), Some("5120"));
    assert_eq!(home.lt(), Some("80"));
    for code in CSV_ONLY_ABSENT {
        assert_eq!(home.get(code), None);
    }

    let login = &samples[1];
    assert_eq!(login.lb(), Some("Login, POST"));
    assert_eq!(login.s(), Some("false"));
    assert_eq!(login.rm(), Some("Internal Server Error"));
}

#[test]
fn test_full_jmeter_xml_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("jmeter.jtl");
    write(
        &path,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<testResults version="1.2">
<httpSample t="120" it="0" lt="80" ts="1700000000000" s="true" lb="Home" rc="200" rm="OK" tn="Users 1-1" dt="text" de="UTF-8" by="5120" sc="1" ec="0" ng="1" na="1" hn="loadgen-01">
  <java.net.URL>http://example.com/</java.net.URL>
</httpSample>
<httpSample t="340" lt="300" ts="1700000000150" s="false" lb="Login &quot;POST&quot;" rc="500" rm="Internal Server Error" tn="Users 1-2" dt="text" by="90" sc="1" ec="1" ng="2" na="2" hn="loadgen-01">
  <assertionResult>
    <name>Response Assertion</name>
    <failure>true</failure>
  </assertionResult>
</httpSample>
</testResults>
"#,
    );

    let parser = create_parser(&path).unwrap();
    assert_eq!(parser.version(), Some("1.2"));
    let samples: Vec<_> = parser.http_samples().collect::<Result<_, _>>().unwrap();

    assert_eq!(samples.len(), 2);
    assert_eq!(populated(&samples[0]).len(), FieldCode::COUNT);
    assert_eq!(samples[0].hn(), Some("loadgen-01"));
    assert_eq!(samples[0].de(), Some("UTF-8"));
    assert_eq!(samples[1].lb(), Some("Login \"POST\""));
    assert_eq!(samples[1].de(), None);
    assert_eq!(samples[1].it(), None);
    assert_eq!(samples[1].ec(), Some("1"));
}

#[test]
fn test_samples_before_failure_stay_valid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.jtl");
    write(
        &path,
        concat!(
            "<?xml version=\"1.0\"?>\n",
            "<testResults version=\"1.2\">\n",
            "<httpSample t=\"1\"/>\n",
            "<httpSample t=\"2\"/>\n",
            "<httpSample t=\"3\" <oops/>\n",
            "</testResults>",
        ),
    );

    let results: Vec<_> = create_parser(&path).unwrap().http_samples().collect();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().t(), Some("1"));
    assert_eq!(results[1].as_ref().unwrap().t(), Some("2"));
    assert!(matches!(results[2], Err(JtlError::Xml(_))));
}

#[test]
fn test_missing_source() {
    let dir = tempdir().unwrap();
    let result = create_parser(dir.path().join("missing.jtl"));
    assert!(matches!(result, Err(JtlError::Io(_))));
}

#[test]
fn test_repeated_partial_reads_start_from_first_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("many.csv");
    let mut content = String::from("elapsed,label\n");
    for i in 0..100 {
        content.push_str(&format!("{},L{}\n", i, i));
    }
    write(&path, &content);

    for _ in 0..3 {
        let first: Vec<_> = create_parser(&path)
            .unwrap()
            .http_samples()
            .take(5)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(first[0].lb(), Some("L0"));
        assert_eq!(first[4].lb(), Some("L4"));
    }
}

/// A log far larger than the read buffer parses with the same per-sample footprint
#[test]
fn test_large_xml_log_streams() {
    const SAMPLES: usize = 100_000;

    let dir = tempdir().unwrap();
    let path = dir.path().join("large.jtl");
    {
        let mut out = BufWriter::new(File::create(&path).unwrap());
        writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>").unwrap();
        writeln!(out, "<testResults version=\"1.2\">").unwrap();
        for i in 0..SAMPLES {
            writeln!(
                out,
                concat!(
                    "<httpSample t=\"{}\" lt=\"{}\" ts=\"{}\" s=\"true\" lb=\"Page {}\" ",
                    "rc=\"200\" rm=\"OK\" tn=\"Users 1-{}\" by=\"2048\">",
                    "<responseData class=\"java.lang.String\">{}</responseData></httpSample>",
                ),
                i % 1000,
                i % 500,
                1_700_000_000_000u64 + i as u64,
                i % 50,
                i % 10,
                "x".repeat(64)
            )
            .unwrap();
        }
        writeln!(out, "</testResults>").unwrap();
    }

    let mut count = 0usize;
    let mut last_ts = 0u64;
    for sample in create_parser(&path).unwrap().http_samples() {
        let sample = sample.unwrap();
        let ts: u64 = sample.ts().unwrap().parse().unwrap();
        assert!(ts > last_ts);
        last_ts = ts;
        count += 1;
    }
    assert_eq!(count, SAMPLES);
}

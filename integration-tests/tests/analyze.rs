use bandwatch_core::analyzer::Analyzer;
use bandwatch_core::cli::run::{analyze_files, batch_report};
use bandwatch_core::config::{AnalyzerConfig, ByteSize, RunMode, SortBy};
use bandwatch_core::report::SnapshotOptions;
use chrono::{TimeZone, Utc};
use integration_tests::harness::{LogDir, json_line};
use integration_tests::harness::logfile::EPOCH;
use pretty_assertions::assert_eq;

fn analyzer(mode: RunMode) -> Analyzer {
    Analyzer::new(AnalyzerConfig {
        mode,
        threshold: ByteSize(0),
        ..AnalyzerConfig::default()
    })
    .unwrap()
}

#[test]
fn test_two_networks_end_to_end() {
    let logs = LogDir::new();
    let path = logs.write(
        "access.log",
        &[
            json_line("10.0.0.1", 5_000_000, "/a", 0, ""),
            json_line("10.0.1.1", 3_000_000, "/b", 1, ""),
        ],
    );

    let mut analyzer = analyzer(RunMode::Analyze);
    analyze_files(&mut analyzer, &[path]).unwrap();

    let opts = SnapshotOptions::from_config(analyzer.config());
    let now = Utc.timestamp_opt(EPOCH + 10, 0).unwrap();
    let rows = analyzer.snapshot(&opts, None, None, now);

    let summary: Vec<(String, u64, u64)> = rows
        .iter()
        .map(|r| (r.prefix.to_string(), r.size, r.requests))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("10.0.0.0/24".to_string(), 5_000_000, 1),
            ("10.0.1.0/24".to_string(), 3_000_000, 1),
        ]
    );
}

#[test]
fn test_plain_and_gzip_files_accumulate() {
    let logs = LogDir::new();
    let plain = logs.write(
        "access.log",
        &[json_line("2001:db8:1::1", 100, "/x", 0, "")],
    );
    let rotated = logs.write_gz(
        "access.log.1.gz",
        &[
            json_line("2001:db8:1:ffff::2", 200, "/y", 5, ""),
            json_line("192.0.2.7", 50, "/z", 6, ""),
        ],
    );

    let mut analyzer = analyzer(RunMode::Analyze);
    analyze_files(&mut analyzer, &[plain, rotated]).unwrap();

    let keys: Vec<String> = analyzer
        .rank(SortBy::Size, "")
        .iter()
        .map(|k| k.prefix.to_string())
        .collect();
    assert_eq!(keys, vec!["2001:db8:1::/48", "192.0.2.0/24"]);
    let v6 = &analyzer.stats()[&analyzer.rank(SortBy::Size, "")[0]];
    assert_eq!(v6.size, 300);
    assert_eq!(v6.last_url(), "/y");
}

#[test]
fn test_threshold_and_server_filters() {
    let logs = LogDir::new();
    let path = logs.write(
        "access.log",
        &[
            json_line("10.0.0.1", 20_000_000, "/big", 0, "mirrors"),
            json_line("10.0.0.1", 1_000, "/small", 1, "mirrors"),
            json_line("10.0.1.1", 20_000_000, "/other", 2, "www"),
        ],
    );

    let mut analyzer = Analyzer::new(AnalyzerConfig {
        mode: RunMode::Analyze,
        server: "mirrors".into(),
        ..AnalyzerConfig::default()
    })
    .unwrap();
    analyze_files(&mut analyzer, &[path]).unwrap();

    let keys = analyzer.rank(SortBy::Size, "mirrors");
    assert_eq!(keys.len(), 1);
    let stats = &analyzer.stats()[&keys[0]];
    assert_eq!((stats.size, stats.requests), (20_000_000, 1));
}

#[test]
fn test_grouped_report_merges_neighbours() {
    let logs = LogDir::new();
    let path = logs.write(
        "access.log",
        &[
            json_line("10.0.0.1", 100, "/a", 0, ""),
            json_line("10.0.1.1", 90, "/b", 1, ""),
            json_line("10.0.2.1", 80, "/c", 2, ""),
            json_line("10.0.3.1", 70, "/d", 3, ""),
            json_line("172.16.0.1", 60, "/e", 4, ""),
        ],
    );

    let mut analyzer = Analyzer::new(AnalyzerConfig {
        mode: RunMode::Analyze,
        threshold: ByteSize(0),
        group: true,
        top_n: 2,
        ..AnalyzerConfig::default()
    })
    .unwrap();
    analyze_files(&mut analyzer, &[path]).unwrap();

    let report = batch_report(&mut analyzer, Utc.timestamp_opt(EPOCH + 60, 0).unwrap());
    let cidrs: Vec<&str> = report
        .lines()
        .skip(1)
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(cidrs, vec!["10.0.0.0/22", "172.16.0.0/24"]);
}

#[test]
fn test_dir_analyze_report() {
    let logs = LogDir::new();
    let path = logs.write(
        "access.log",
        &[
            json_line("10.0.0.1", 500, "/debian/pool/a.deb", 0, ""),
            json_line("10.0.1.1", 500, "/debian/pool/b.deb", 1, ""),
            json_line("10.0.0.1", 100, "/ubuntu/dists/Release", 2, ""),
        ],
    );

    let mut analyzer = analyzer(RunMode::DirAnalyze);
    analyze_files(&mut analyzer, &[path]).unwrap();

    let rows = analyzer.directory_report(10, SortBy::Size, Utc.timestamp_opt(EPOCH, 0).unwrap());
    let summary: Vec<(&str, u64, usize)> = rows
        .iter()
        .map(|r| (r.directory.as_str(), r.size, r.clients))
        .collect();
    assert_eq!(summary, vec![("/debian", 1000, 2), ("/ubuntu", 100, 1)]);
}

#[test]
fn test_combined_format() {
    let logs = LogDir::new();
    let path = logs.write(
        "access.log",
        &[
            r#"203.0.113.9 - - [14/Nov/2023:22:13:20 +0000] "GET /iso/big.iso HTTP/1.1" 200 4096 "-" "Wget/1.21""#.to_string(),
            r#"203.0.113.10 - - [14/Nov/2023:22:13:21 +0000] "GET /iso/small.iso HTTP/1.1" 200 1024 "-" "Wget/1.21""#.to_string(),
        ],
    );

    let mut analyzer = Analyzer::new(AnalyzerConfig {
        mode: RunMode::Analyze,
        threshold: ByteSize(0),
        parser: "combined".into(),
        ..AnalyzerConfig::default()
    })
    .unwrap();
    analyze_files(&mut analyzer, &[path]).unwrap();

    let keys = analyzer.rank(SortBy::Size, "");
    assert_eq!(keys.len(), 1);
    let stats = &analyzer.stats()[&keys[0]];
    assert_eq!(stats.size, 5120);
    assert_eq!(stats.last_url(), "/iso/small.iso");
}

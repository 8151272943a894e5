use crate::cli::AnalyzeArgs;
use crate::config::{RunMode, SortBy};
use clap::Parser;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
struct Harness {
    #[command(flatten)]
    args: AnalyzeArgs,
}

fn parse(argv: &[&str]) -> AnalyzeArgs {
    Harness::try_parse_from(std::iter::once("bandwatch").chain(argv.iter().copied()))
        .unwrap()
        .args
}

#[test]
fn test_defaults_match_config_defaults() {
    let config = parse(&[]).into_config(RunMode::Live);

    assert_eq!(config.top_n, 10);
    assert_eq!(config.threshold.get(), 10_000_000);
    assert_eq!(config.print_delta.get(), 1_000_000_000);
    assert_eq!(config.refresh, Duration::from_secs(5));
    assert_eq!(config.parser, "nginx-json");
    assert_eq!((config.prefix_v4, config.prefix_v6), (24, 48));
    assert!(!config.whole);
    assert!(config.files.is_empty());
}

#[test]
fn test_flags_map_into_config() {
    let config = parse(&[
        "-n", "5", "-t", "1GiB", "-s", "mirrors", "-S", "reqs", "-a", "--truncate-to", "40",
        "--prefixv4", "16", "-o", "/tmp/out.log", "-p", "caddy", "-g", "--no-netstat", "a.log",
        "b.log.gz",
    ])
    .into_config(RunMode::Analyze);

    assert_eq!(config.top_n, 5);
    assert_eq!(config.threshold.get(), 1 << 30);
    assert_eq!(config.server, "mirrors");
    assert_eq!(config.sort_by, SortBy::Requests);
    assert!(config.absolute);
    assert_eq!(config.truncate_to, 40);
    assert_eq!(config.prefix_v4, 16);
    assert_eq!(config.log_output, Some(PathBuf::from("/tmp/out.log")));
    assert_eq!(config.parser, "caddy");
    assert!(config.group);
    assert!(config.no_netstat);
    assert!(config.whole);
    assert_eq!(
        config.files,
        vec![PathBuf::from("a.log"), PathBuf::from("b.log.gz")]
    );
}

#[test]
fn test_bad_values_are_rejected() {
    let parse = |argv: &[&str]| {
        Harness::try_parse_from(std::iter::once("bandwatch").chain(argv.iter().copied()))
    };
    assert!(parse(&["-t", "lots"]).is_err());
    assert!(parse(&["-S", "colour"]).is_err());
}

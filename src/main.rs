use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::*;
use std::path::PathBuf;
use std::process;

use portprobe::{
    config::ScanConfig,
    network::ScanMode,
    output::{self, OutputFormat},
    scanner::engine::ScanEngine,
    utils::{parse_port_spec, Logger},
};

fn build_cli() -> Command {
    Command::new("portprobe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Concurrent TCP connect / UDP probe port scanner")
        .arg(
            Arg::new("target")
                .value_name("TARGET")
                .help("IP address or hostname to scan")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("ports")
                .short('p')
                .long("ports")
                .value_name("PORTS")
                .help("Ports to scan (e.g. 1-1024, 22,80,443, 22,8000-8100) [default: 1-1024]"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Timeout for each port probe in seconds, fractions allowed [default: 1.0]")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("scan-type")
                .short('s')
                .long("scan-type")
                .value_name("TYPE")
                .help("Scan type [default: tcp]")
                .value_parser(["tcp", "udp"]),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .value_name("COUNT")
                .help("Maximum number of probes in flight [default: 100]")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (default: ~/.portprobe.toml if present)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output-format")
                .short('o')
                .long("output")
                .value_name("FORMAT")
                .help("Output format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output (repeat for trace)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log warnings and errors")
                .action(ArgAction::SetTrue),
        )
}

/// Config file first, then command-line flags on top
fn build_config(matches: &ArgMatches) -> anyhow::Result<ScanConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ScanConfig::from_toml_file(path)?,
        None => ScanConfig::load_default_config(),
    };

    if let Some(spec) = matches.get_one::<String>("ports") {
        let ports = parse_port_spec(spec)
            .with_context(|| format!("bad port specification '{}'", spec))?;
        config = config.with_ports(ports);
    }

    if let Some(&seconds) = matches.get_one::<f64>("timeout") {
        if !seconds.is_finite() || seconds <= 0.0 {
            anyhow::bail!("timeout must be a positive number of seconds, got {}", seconds);
        }
        config = config.with_timeout_secs(seconds);
    }

    if let Some(mode) = matches.get_one::<String>("scan-type") {
        let mode: ScanMode = mode.parse().map_err(anyhow::Error::msg)?;
        config = config.with_mode(mode);
    }

    if let Some(&threads) = matches.get_one::<usize>("threads") {
        config = config.with_concurrency(threads);
    }

    config.validate()?;
    Ok(config)
}

async fn run(matches: ArgMatches) -> anyhow::Result<()> {
    let target = matches
        .get_one::<String>("target")
        .context("missing target")?
        .clone();
    let format: OutputFormat = matches
        .get_one::<String>("output-format")
        .map(|f| f.parse::<OutputFormat>())
        .transpose()
        .map_err(anyhow::Error::msg)?
        .unwrap_or_default();

    let config = build_config(&matches)?;
    let engine = ScanEngine::new(config)?;
    let report = engine
        .scan(&target)
        .await
        .with_context(|| format!("scan of {} failed", target))?;

    print!("{}", output::render(&report, format)?);
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();

    Logger::init(Logger::level_for(
        matches.get_count("verbose"),
        matches.get_flag("quiet"),
    ));

    if let Err(e) = run(matches).await {
        eprintln!("{} {:#}", "[!] Error:".bright_red(), e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn matches(args: &[&str]) -> ArgMatches {
        build_cli().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn cli_flags_override_defaults() {
        let m = matches(&[
            "portprobe", "10.0.0.1", "-p", "22,80", "-t", "0.5", "-s", "udp", "--threads", "7",
            "-c", "/dev/null",
        ]);
        let config = build_config(&m).unwrap();

        assert_eq!(config.ports, vec![22, 80]);
        assert_eq!(config.timeout, 500);
        assert_eq!(config.mode, ScanMode::Udp);
        assert_eq!(config.concurrency, 7);
    }

    #[test]
    fn sub_millisecond_timeout_rounds_up() {
        let m = matches(&["portprobe", "10.0.0.1", "-t", "0.0004", "-c", "/dev/null"]);
        let config = build_config(&m).unwrap();
        assert_eq!(config.timeout, 1);
    }

    #[test]
    fn explicit_config_file_is_layered_under_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode = \"udp\"\nconcurrency = 3\ntimeout = 250").unwrap();
        let path = file.path().to_str().unwrap();

        let m = matches(&["portprobe", "10.0.0.1", "-c", path, "--threads", "9"]);
        let config = build_config(&m).unwrap();
        assert_eq!(config.mode, ScanMode::Udp);
        assert_eq!(config.timeout, 250);
        assert_eq!(config.concurrency, 9);
    }

    #[test]
    fn broken_explicit_config_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode = \"sctp\"").unwrap();
        let path = file.path().to_str().unwrap();

        let m = matches(&["portprobe", "10.0.0.1", "-c", path]);
        let err = build_config(&m).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
    }

    #[test]
    fn broken_home_config_falls_back_to_defaults() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join(".portprobe.toml"), "concurrency = \"lots\"").unwrap();
        std::env::set_var("HOME", home.path());

        let m = matches(&["portprobe", "10.0.0.1"]);
        let config = build_config(&m).unwrap();
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn cli_rejects_bad_values() {
        let m = matches(&["portprobe", "10.0.0.1", "-p", "90-80", "-c", "/dev/null"]);
        assert!(build_config(&m).is_err());

        let m = matches(&["portprobe", "10.0.0.1", "-t", "0", "-c", "/dev/null"]);
        assert!(build_config(&m).is_err());

        assert!(build_cli()
            .try_get_matches_from(["portprobe", "10.0.0.1", "-s", "sctp"])
            .is_err());
    }

    #[test]
    fn cli_requires_target() {
        assert!(build_cli().try_get_matches_from(["portprobe"]).is_err());
    }
}

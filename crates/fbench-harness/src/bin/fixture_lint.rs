use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;

use fbench_harness::FixtureSet;

const LINT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone)]
struct Config {
    paths: Vec<PathBuf>,
    json: bool,
    allow_empty: bool,
}

impl Config {
    fn parse() -> Result<Self, String> {
        let mut paths = Vec::new();
        let mut json = false;
        let mut allow_empty = false;

        let args: Vec<String> = env::args().skip(1).collect();
        let mut index = 0_usize;
        while index < args.len() {
            match args[index].as_str() {
                "--json" => json = true,
                "--allow-empty" => allow_empty = true,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other if other.starts_with('-') => {
                    return Err(format!("unknown_argument: {other}"));
                }
                path => paths.push(PathBuf::from(path)),
            }
            index += 1;
        }

        if paths.is_empty() {
            return Err("at least one fixture document path is required".to_owned());
        }
        Ok(Self {
            paths,
            json,
            allow_empty,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct FileLint {
    path: String,
    ok: bool,
    fixtures: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct LintReport {
    schema_version: String,
    files_checked: usize,
    files_ok: usize,
    overall_pass: bool,
    files: Vec<FileLint>,
}

fn print_help() {
    println!(
        "\
fixture_lint: validate fixture documents

Parses each document as an ordered JSON array of {{inputs, expected}}
records and reports per-file fixture counts and content hashes. Exits
nonzero if any document fails to load.

USAGE:
  cargo run -p fbench-harness --bin fixture_lint -- [OPTIONS] <PATH>...

OPTIONS:
  --json          Emit the lint report as pretty-printed JSON
  --allow-empty   Accept documents containing zero fixtures
  -h, --help      Show help
"
    );
}

fn lint_file(path: &Path, allow_empty: bool) -> FileLint {
    let display = path.display().to_string();
    let result = FixtureSet::load(path).and_then(|set| {
        if !allow_empty {
            set.require_non_empty()?;
        }
        Ok(set)
    });
    match result {
        Ok(set) => FileLint {
            path: display,
            ok: true,
            fixtures: set.len(),
            content_hash: Some(set.content_hash().to_owned()),
            error: None,
            suggestion: None,
        },
        Err(error) => FileLint {
            path: display,
            ok: false,
            fixtures: 0,
            content_hash: None,
            suggestion: error.suggestion().map(str::to_owned),
            error: Some(error.to_string()),
        },
    }
}

fn build_report(paths: &[PathBuf], allow_empty: bool) -> LintReport {
    let files: Vec<FileLint> = paths
        .iter()
        .map(|path| lint_file(path, allow_empty))
        .collect();
    let files_ok = files.iter().filter(|file| file.ok).count();
    LintReport {
        schema_version: LINT_SCHEMA_VERSION.to_owned(),
        files_checked: files.len(),
        files_ok,
        overall_pass: files_ok == files.len(),
        files,
    }
}

fn run() -> Result<bool, String> {
    let config = Config::parse()?;
    let report = build_report(&config.paths, config.allow_empty);

    if config.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|error| format!("lint_report_serialize_failed: {error}"))?;
        println!("{json}");
    } else {
        for file in &report.files {
            if file.ok {
                println!(
                    "INFO fixture_lint_ok path={} fixtures={} content_hash={}",
                    file.path,
                    file.fixtures,
                    file.content_hash.as_deref().unwrap_or("n/a"),
                );
            } else {
                println!(
                    "ERROR fixture_lint_failed path={} error=\"{}\"{}",
                    file.path,
                    file.error.as_deref().unwrap_or("unknown"),
                    file.suggestion
                        .as_deref()
                        .map_or_else(String::new, |hint| format!(" hint=\"{hint}\"")),
                );
            }
        }
        println!(
            "INFO fixture_lint_summary checked={} ok={} overall_pass={}",
            report.files_checked, report.files_ok, report.overall_pass,
        );
    }

    Ok(report.overall_pass)
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("ERROR fixture_lint overall_pass=false");
            ExitCode::from(1)
        }
        Err(error) => {
            eprintln!("ERROR fixture_lint failed: {error}");
            ExitCode::from(2)
        }
    }
}

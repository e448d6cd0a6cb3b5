use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use serde_json::{Map, Value};

use fbench_harness::catalog::{
    addition_fixtures, addition_subject, echo_subject, shape_fixtures, uppercase_fixtures,
    uppercase_subject,
};
use fbench_harness::{run, write_report, FixtureSet, RunConfig, TestReport, DEFAULT_TOLERANCE};

type SubjectFn = fn(&Map<String, Value>) -> Result<Value, String>;

const BUILTIN_SUITES: &[&str] = &["addition", "uppercase", "shapes"];
const SUBJECT_NAMES: &[&str] = &["addition", "uppercase", "echo"];

#[derive(Debug, Clone)]
struct Config {
    suites: Vec<String>,
    fixtures: Option<PathBuf>,
    subject: Option<String>,
    tolerance: f64,
    out_dir: Option<PathBuf>,
    json: bool,
}

impl Config {
    fn parse() -> Result<Self, String> {
        let mut suites = Vec::new();
        let mut fixtures = None;
        let mut subject = None;
        let mut tolerance = DEFAULT_TOLERANCE;
        let mut out_dir = None;
        let mut json = false;

        let args: Vec<String> = env::args().skip(1).collect();
        let mut index = 0_usize;
        while index < args.len() {
            match args[index].as_str() {
                "--suite" => {
                    index += 1;
                    let value = args
                        .get(index)
                        .ok_or_else(|| "missing value for --suite".to_owned())?;
                    suites.push(value.clone());
                }
                "--fixtures" => {
                    index += 1;
                    let value = args
                        .get(index)
                        .ok_or_else(|| "missing value for --fixtures".to_owned())?;
                    fixtures = Some(PathBuf::from(value));
                }
                "--subject" => {
                    index += 1;
                    let value = args
                        .get(index)
                        .ok_or_else(|| "missing value for --subject".to_owned())?;
                    subject = Some(value.clone());
                }
                "--tolerance" => {
                    index += 1;
                    let value = args
                        .get(index)
                        .ok_or_else(|| "missing value for --tolerance".to_owned())?;
                    tolerance = value
                        .parse::<f64>()
                        .map_err(|error| format!("invalid --tolerance '{value}': {error}"))?;
                }
                "--out" => {
                    index += 1;
                    let value = args
                        .get(index)
                        .ok_or_else(|| "missing value for --out".to_owned())?;
                    out_dir = Some(PathBuf::from(value));
                }
                "--json" => json = true,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => {
                    return Err(format!("unknown_argument: {other}"));
                }
            }
            index += 1;
        }

        if fixtures.is_some() && !suites.is_empty() {
            return Err("--fixtures and --suite are mutually exclusive".to_owned());
        }
        if fixtures.is_some() && subject.is_none() {
            return Err("--fixtures requires --subject".to_owned());
        }
        if subject.is_some() && fixtures.is_none() {
            return Err("--subject requires --fixtures".to_owned());
        }
        Ok(Self {
            suites,
            fixtures,
            subject,
            tolerance,
            out_dir,
            json,
        })
    }
}

fn print_help() {
    println!(
        "\
suite_runner: run fixture suites against reference subjects

With no arguments, runs every built-in suite against its paired subject.
A fixture document on disk can be run against a named reference subject
instead. Exits nonzero if any fixture fails.

USAGE:
  cargo run -p fbench-harness --bin suite_runner -- [OPTIONS]

OPTIONS:
  --suite <NAME>       Run one built-in suite (addition, uppercase, shapes);
                       repeatable
  --fixtures <PATH>    Run a fixture document from disk (requires --subject)
  --subject <NAME>     Reference subject for --fixtures (addition, uppercase,
                       echo)
  --tolerance <FLOAT>  Absolute numeric tolerance (default 1e-6)
  --out <DIR>          Write report.json and summary.md per run under DIR
  --json               Emit the run reports as pretty-printed JSON
  -h, --help           Show help
"
    );
}

#[derive(Debug)]
struct PlannedRun {
    label: String,
    set: FixtureSet,
    subject: SubjectFn,
}

fn resolve_subject(name: &str) -> Option<SubjectFn> {
    match name {
        "addition" => Some(addition_subject),
        "uppercase" => Some(uppercase_subject),
        "echo" => Some(echo_subject),
        _ => None,
    }
}

fn builtin_run(name: &str) -> Option<PlannedRun> {
    let (set, subject): (FixtureSet, SubjectFn) = match name {
        "addition" => (addition_fixtures(), addition_subject),
        "uppercase" => (uppercase_fixtures(), uppercase_subject),
        "shapes" => (shape_fixtures(), echo_subject),
        _ => return None,
    };
    Some(PlannedRun {
        label: set.origin().to_owned(),
        set,
        subject,
    })
}

fn planned_runs(config: &Config) -> Result<Vec<PlannedRun>, String> {
    if let Some(path) = &config.fixtures {
        let name = config
            .subject
            .as_deref()
            .ok_or_else(|| "--fixtures requires --subject".to_owned())?;
        let subject = resolve_subject(name).ok_or_else(|| {
            format!(
                "unknown_subject: {name} (expected one of: {})",
                SUBJECT_NAMES.join(", ")
            )
        })?;
        let set = FixtureSet::load(path).map_err(|error| {
            let hint = error
                .suggestion()
                .map_or_else(String::new, |hint| format!(" ({hint})"));
            format!("fixture_load_failed: {error}{hint}")
        })?;
        return Ok(vec![PlannedRun {
            label: format!("file/{name}"),
            set,
            subject,
        }]);
    }

    let names: Vec<&str> = if config.suites.is_empty() {
        BUILTIN_SUITES.to_vec()
    } else {
        config.suites.iter().map(String::as_str).collect()
    };
    names
        .into_iter()
        .map(|name| {
            builtin_run(name).ok_or_else(|| {
                format!(
                    "unknown_suite: {name} (expected one of: {})",
                    BUILTIN_SUITES.join(", ")
                )
            })
        })
        .collect()
}

fn execute_runs(runs: &[PlannedRun], tolerance: f64) -> Result<Vec<TestReport>, String> {
    let mut reports = Vec::with_capacity(runs.len());
    for planned in runs {
        let config = RunConfig::with_tolerance(planned.label.as_str(), tolerance)
            .map_err(|error| format!("bad_tolerance: {error}"))?;
        reports.push(run(&planned.set, &planned.subject, &config));
    }
    Ok(reports)
}

// Suite labels contain '/'; artifact directories flatten them.
fn artifact_slug(suite: &str) -> String {
    suite
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

fn run_suites() -> Result<bool, String> {
    let config = Config::parse()?;
    let runs = planned_runs(&config)?;
    let reports = execute_runs(&runs, config.tolerance)?;

    if let Some(out_dir) = &config.out_dir {
        for report in &reports {
            let target = out_dir.join(artifact_slug(&report.suite));
            write_report(&target, report)
                .map_err(|error| format!("artifact_write_failed: {error}"))?;
            if !config.json {
                println!(
                    "INFO suite_artifacts_written suite={} dir={}",
                    report.suite,
                    target.display()
                );
            }
        }
    }

    if config.json {
        let json = serde_json::to_string_pretty(&reports)
            .map_err(|error| format!("report_serialize_failed: {error}"))?;
        println!("{json}");
    } else {
        for report in &reports {
            println!(
                "INFO suite_run suite={} outcome={} total={} passed={} mismatched={} faulted={}",
                report.suite,
                report.outcome,
                report.total,
                report.passed,
                report.mismatched,
                report.faulted,
            );
            for case in report.failures() {
                println!(
                    "ERROR suite_case suite={} index={} status={} expected={} actual=\"{}\"",
                    report.suite, case.index, case.status, case.expected, case.actual,
                );
            }
        }
    }

    let overall_pass = reports.iter().all(TestReport::all_passed);
    if !config.json {
        println!(
            "INFO suite_runner_summary suites={} overall_pass={overall_pass}",
            reports.len(),
        );
    }
    Ok(overall_pass)
}

fn main() -> ExitCode {
    match run_suites() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("ERROR suite_runner overall_pass=false");
            ExitCode::from(1)
        }
        Err(error) => {
            eprintln!("ERROR suite_runner failed: {error}");
            ExitCode::from(2)
        }
    }
}

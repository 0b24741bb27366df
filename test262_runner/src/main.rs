//! The Test262 conformance driver (spec.md §6.2, §6.3), patterned on the
//! teacher's `tests/test262_runner.rs`. Not part of the core: its only
//! interface to the engine is shelling out to the `cli eval` binary built
//! from the sibling `cli` crate (spec.md §1: "Its only interface to the
//! core is `new engine → run_script(path, text) → outcome`", realized at
//! the process boundary here since the driver is a separate binary).
//!
//! No logging facade (SPEC_FULL.md §10.3): progress and the final tally go
//! to stdout/stderr, matching the teacher's own driver.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use clap::Parser as ClapParser;
use rayon::iter::{ParallelBridge, ParallelIterator};
use serde::Deserialize;
use wait_timeout::ChildExt;

const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Flags recognized inside a test's YAML frontmatter (spec.md §6.2).
/// Unknown flags cause the driver to skip the test rather than guess at
/// their meaning.
#[derive(Debug, Default)]
struct Flags {
    only_strict: bool,
    no_strict: bool,
    generated: bool,
    unknown: bool,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
enum FailurePhase {
    Parse,
    Resolution,
    Runtime,
}

#[derive(Deserialize, Debug)]
struct Negative {
    phase: FailurePhase,
    #[serde(rename = "type")]
    error_type: String,
}

#[derive(Deserialize, Debug, Default)]
struct RawMetadata {
    negative: Option<Negative>,
    #[serde(default)]
    includes: Vec<PathBuf>,
    #[serde(default)]
    flags: Vec<String>,
}

#[derive(Debug, Default)]
struct TestMetadata {
    negative: Option<Negative>,
    includes: Vec<PathBuf>,
    flags: Flags,
}

fn parse_metadata(path: &Path) -> Option<TestMetadata> {
    const YAML_START: &str = "/*---";
    const YAML_END: &str = "---*/";

    let mut text = String::new();
    File::open(path).ok()?.read_to_string(&mut text).ok()?;

    let start = text.find(YAML_START)? + YAML_START.len();
    let end = start + text[start..].find(YAML_END)?;
    let raw: RawMetadata = serde_yml::from_str(&text[start..end]).ok()?;

    let mut flags = Flags::default();
    for flag in &raw.flags {
        match flag.as_str() {
            "onlyStrict" => flags.only_strict = true,
            "noStrict" => flags.no_strict = true,
            "generated" => flags.generated = true,
            // module/raw/async/CanBlockIs*/non-deterministic name features
            // this driver does not exercise (no modules, no async, single
            // worker per test): treated as "unknown", which the caller
            // skips rather than runs under a guessed configuration.
            _ => flags.unknown = true,
        }
    }

    Some(TestMetadata {
        negative: raw.negative,
        includes: raw.includes,
        flags,
    })
}

fn is_test_file(name: &OsStr) -> bool {
    let Some(name) = name.to_str() else {
        return false;
    };
    name.ends_with(".js") && !name.contains("_FIXTURE")
}

fn collect_tests(root: &Path, filter: Option<&str>, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            collect_tests(&path, filter, out);
        } else if is_test_file(path.file_name().unwrap_or_default()) {
            if filter.map_or(true, |f| path.to_string_lossy().contains(f)) {
                out.push(path);
            }
        }
    }
}

#[derive(Debug, ClapParser)]
#[command(name = "test262", about = "A Test262 runner for the engine crate")]
struct Cli {
    /// Root of the Test262 checkout.
    #[arg(long)]
    test262: PathBuf,

    /// A JSON config file listing relative test paths to run.
    #[arg(long, conflicts_with = "single")]
    config: Option<PathBuf>,

    /// Run exactly one test, given as a path relative to `--test262`.
    #[arg(long, conflicts_with = "config")]
    single: Option<PathBuf>,

    /// Only run tests whose path contains this substring.
    #[arg(long)]
    filter: Option<String>,

    /// `i/n`: this worker's shard identity out of `n` total workers.
    #[arg(long)]
    worker: Option<String>,
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(rename = "testCases")]
    test_cases: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Pass,
    Fail,
    Crash,
    Timeout,
    Skip,
}

fn main() {
    let cli = Cli::parse();

    let cli_bin = sibling_binary("cli");
    let harness_dir = cli.test262.join("harness");
    let sta = harness_dir.join("sta.js");
    let assert_js = harness_dir.join("assert.js");

    let mut tests = Vec::new();
    if let Some(single) = &cli.single {
        tests.push(cli.test262.join(single));
    } else if let Some(config) = &cli.config {
        let text = fs::read_to_string(config).expect("could not read --config file");
        let config: ConfigFile = serde_json::from_str(&text).expect("invalid --config JSON");
        tests.extend(config.test_cases.into_iter().map(|p| cli.test262.join(p)));
    } else {
        collect_tests(
            &cli.test262.join("test"),
            cli.filter.as_deref(),
            &mut tests,
        );
    }

    if let Some(spec) = &cli.worker {
        let (i, n) = parse_worker(spec);
        tests = tests
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| idx % n == i)
            .map(|(_, p)| p)
            .collect();
    }

    let total = tests.len();
    let counts: HashMap<&'static str, AtomicUsize> = [
        ("pass", AtomicUsize::new(0)),
        ("fail", AtomicUsize::new(0)),
        ("crash", AtomicUsize::new(0)),
        ("timeout", AtomicUsize::new(0)),
        ("skip", AtomicUsize::new(0)),
    ]
    .into_iter()
    .collect();
    let mut failures: Vec<(PathBuf, Outcome)> = Vec::new();
    let failures_mutex = std::sync::Mutex::new(&mut failures);

    tests.into_iter().par_bridge().for_each(|test_path| {
        let outcome = run_test(&cli_bin, &harness_dir, &sta, &assert_js, &test_path);
        let key = match outcome {
            Outcome::Pass => "pass",
            Outcome::Fail => "fail",
            Outcome::Crash => "crash",
            Outcome::Timeout => "timeout",
            Outcome::Skip => "skip",
        };
        counts[key].fetch_add(1, Ordering::Relaxed);
        if !matches!(outcome, Outcome::Pass | Outcome::Skip) {
            failures_mutex.lock().unwrap().push((test_path, outcome));
        }
    });

    println!("ran {total} tests:");
    for key in ["pass", "fail", "crash", "timeout", "skip"] {
        println!("  {key}: {}", counts[key].load(Ordering::Relaxed));
    }
    for (path, outcome) in &failures {
        eprintln!("{outcome:?}: {}", path.display());
    }

    let had_failure = counts["fail"].load(Ordering::Relaxed) > 0
        || counts["crash"].load(Ordering::Relaxed) > 0
        || counts["timeout"].load(Ordering::Relaxed) > 0;
    std::process::exit(if had_failure { 1 } else { 0 });
}

fn parse_worker(spec: &str) -> (usize, usize) {
    let (i, n) = spec.split_once('/').expect("--worker expects i/n");
    (
        i.parse().expect("--worker index must be a number"),
        n.parse().expect("--worker count must be a number"),
    )
}

fn sibling_binary(name: &str) -> PathBuf {
    let mut path = std::env::current_exe().expect("could not resolve current executable");
    path.pop();
    path.push(name);
    if cfg!(windows) {
        path.set_extension("exe");
    }
    path
}

fn run_test(
    cli_bin: &Path,
    harness_dir: &Path,
    sta: &Path,
    assert_js: &Path,
    test_path: &Path,
) -> Outcome {
    let Some(metadata) = parse_metadata(test_path) else {
        return Outcome::Skip;
    };
    if metadata.flags.unknown || metadata.flags.generated {
        return Outcome::Skip;
    }

    let modes: &[bool] = match (metadata.flags.only_strict, metadata.flags.no_strict) {
        (true, true) => return Outcome::Skip,
        (true, false) => &[true],
        (false, true) => &[false],
        (false, false) => &[false, true],
    };

    for strict in modes {
        let outcome = run_once(cli_bin, harness_dir, sta, assert_js, test_path, &metadata, *strict);
        if outcome != Outcome::Pass {
            return outcome;
        }
    }
    Outcome::Pass
}

#[allow(clippy::too_many_arguments)]
fn run_once(
    cli_bin: &Path,
    harness_dir: &Path,
    sta: &Path,
    assert_js: &Path,
    test_path: &Path,
    metadata: &TestMetadata,
    strict: bool,
) -> Outcome {
    let mut command = Command::new(cli_bin);
    command.arg("eval");
    if !strict {
        command.arg("--no-strict");
    }
    command.arg(sta).arg(assert_js);
    for include in &metadata.includes {
        command.arg(harness_dir.join(include));
    }
    command.arg(test_path);
    command.stdout(Stdio::piped()).stderr(Stdio::piped());

    let Ok(mut child) = command.spawn() else {
        return Outcome::Crash;
    };
    let status = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            return Outcome::Timeout;
        }
        Err(_) => return Outcome::Crash,
    };

    let mut stderr = String::new();
    if let Some(mut s) = child.stderr.take() {
        let _ = s.read_to_string(&mut stderr);
    }

    match (status.success(), &metadata.negative) {
        (true, None) => Outcome::Pass,
        (true, Some(_)) => Outcome::Fail, // unexpected-success
        (false, None) => classify_unexpected_failure(status.code(), &stderr),
        (false, Some(expected)) => {
            reconcile_negative(status.code(), &stderr, test_path, expected)
        }
    }
}

fn classify_unexpected_failure(code: Option<i32>, stderr: &str) -> Outcome {
    if code != Some(1) {
        return Outcome::Crash;
    }
    if stderr.contains(": unimplemented") {
        Outcome::Skip
    } else {
        Outcome::Fail
    }
}

fn reconcile_negative(code: Option<i32>, stderr: &str, test_path: &Path, expected: &Negative) -> Outcome {
    if code != Some(1) {
        return Outcome::Crash;
    }
    if stderr.contains(": unimplemented") {
        return Outcome::Skip;
    }
    let prefix = format!("{}: ", test_path.display());
    let Some(line) = stderr.lines().find(|l| l.starts_with(&prefix)) else {
        return Outcome::Fail;
    };
    let body = &line[prefix.len()..];
    // Parse-time and runtime negative expectations both surface as
    // `FailureKind::VmException` here (spec.md §4.7: a parse failure is
    // reported as a `SyntaxError` vm-exception, not a distinct channel),
    // so phase only matters for documentation, not dispatch.
    let _ = &expected.phase;
    if !body.starts_with("exception") {
        return Outcome::Fail;
    }
    match body.find('(').zip(body.find(')')) {
        Some((open, close)) if close > open => {
            let name = &body[open + 1..close];
            if name == expected.error_type {
                Outcome::Pass
            } else {
                Outcome::Fail // wrong-exception-type
            }
        }
        _ => Outcome::Fail,
    }
}

//! Runs the YAML documents under `tests/cases`.
//!
//! Every `<name>.yaml` comes with either a `<name>.events` file, holding the expected events in
//! the notation of the YAML test suite, one per line, or a `<name>.error` file, holding the
//! expected error kind on its first line.

use std::{
    fmt::Write,
    fs,
    path::{Path, PathBuf},
};

use libtest_mimic::{Arguments, Failed, Trial};

use yamlet_parser::{parse_str, Event, Marker, ScanError};

type Result<T, E = Box<dyn std::error::Error>> = std::result::Result<T, E>;

const CASES_DIR: &str = "tests/cases";

enum Expected {
    Events(Vec<String>),
    Error(String),
}

struct YamlCase {
    yaml: String,
    expected: Expected,
}

fn main() -> Result<()> {
    let arguments = Arguments::from_args();
    let mut paths = fs::read_dir(CASES_DIR)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<PathBuf>, _>>()?;
    paths.retain(|path| path.extension().map_or(false, |ext| ext == "yaml"));
    paths.sort();

    let trials = paths
        .iter()
        .map(|path| -> Result<Trial> {
            let name = path
                .file_stem()
                .ok_or("unexpected filename")?
                .to_string_lossy()
                .to_string();
            let case = load_case(path)?;
            Ok(Trial::test(name, move || run_case(&case)))
        })
        .collect::<Result<Vec<_>>>()?;

    libtest_mimic::run(&arguments, trials).exit();
}

fn load_case(path: &Path) -> Result<YamlCase> {
    let yaml = fs::read_to_string(path)?;
    let events_path = path.with_extension("events");
    let error_path = path.with_extension("error");
    let expected = if events_path.exists() {
        Expected::Events(
            fs::read_to_string(&events_path)?
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    } else if error_path.exists() {
        let text = fs::read_to_string(&error_path)?;
        let kind = text.lines().next().ok_or("empty error file")?.trim();
        Expected::Error(kind.to_owned())
    } else {
        return Err(format!("no expectation for {}", path.display()).into());
    };
    Ok(YamlCase { yaml, expected })
}

fn run_case(case: &YamlCase) -> Result<(), Failed> {
    let mut events: Vec<Event> = vec![];
    let result = parse_str(&case.yaml, &mut events);
    let actual: Vec<String> = events.iter().map(ToString::to_string).collect();

    let error_text = match (&result, &case.expected) {
        (Ok(_), Expected::Events(expected)) => events_differ(&actual, expected),
        (Ok(_), Expected::Error(kind)) => Some(format!(
            "no error when expected {kind}, got:\n{}",
            actual.join("\n")
        )),
        (Err(err), Expected::Events(_)) => Some(format!("unexpected error: {err}")),
        (Err(err), Expected::Error(kind)) => {
            let actual_kind = format!("{:?}", err.kind());
            (&actual_kind != kind).then(|| format!("expected a {kind} error, got: {err}"))
        }
    };

    match error_text {
        None => Ok(()),
        Some(mut text) => {
            add_error_context(
                &mut text,
                &case.yaml,
                result.as_ref().err().map(ScanError::marker),
            );
            Err(text.into())
        }
    }
}

fn events_differ(actual: &[String], expected: &[String]) -> Option<String> {
    for (idx, (act, exp)) in actual.iter().zip(expected).enumerate() {
        if act != exp {
            return Some(format!(
                "line {idx} differs: \n=> expected `{exp}`\n=>    found `{act}`",
            ));
        }
    }
    if actual.len() == expected.len() {
        None
    } else {
        Some(format!(
            "expected {} events, found {}:\n{}",
            expected.len(),
            actual.len(),
            actual.join("\n")
        ))
    }
}

// Enrich the error message with the failing input, and a caret pointing
// at the position that errored.
fn add_error_context(text: &mut String, yaml: &str, marker: Option<&Marker>) {
    let _ = writeln!(text, "\n### Input:\n{yaml}\n### End");
    if let Some(mark) = marker {
        let _ = writeln!(text, "### Error position");
        for (idx, line) in yaml.lines().enumerate() {
            let _ = writeln!(text, "{line}");
            if idx + 1 == mark.line() {
                let _ = writeln!(text, "{}^", " ".repeat(mark.col() - 1));
            }
        }
        let _ = writeln!(text, "### End error position");
    }
}

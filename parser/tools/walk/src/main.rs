use hashlink::LinkedHashMap;
use miette::{bail, Diagnostic, IntoDiagnostic, NamedSource, Result, SourceSpan};
use rustyline::{error::ReadlineError, DefaultEditor};
use thiserror::Error;
use yamlet::{make_safe_scalar, ScanError, Yaml};

/// A REPL to navigate a YAML document.
///
/// See [`read_action`] for commands.
fn main() -> Result<()> {
    let args: Vec<_> = std::env::args().collect();
    let [_, filename] = args.as_slice() else {
        bail!("Usage: walk <file.yaml>");
    };
    let contents = std::fs::read_to_string(filename).into_diagnostic()?;
    let mut docs = match Yaml::load_from_str(&contents) {
        Ok(docs) => docs,
        Err(err) => return Err(LoadErr::new(filename, &contents, &err).into()),
    };
    let root = if docs.len() == 1 {
        docs.swap_remove(0)
    } else {
        Yaml::Sequence(docs)
    };
    walk(&contents, &root)
}

fn walk<'a>(contents: &str, root: &'a Yaml<'a>) -> Result<()> {
    let mut io = DefaultEditor::new().into_diagnostic()?;
    let mut stack = vec![root];

    print(contents, &stack);

    loop {
        let err = match read_action(&mut io)? {
            Action::StepInKey(key) => step_in_key(&mut stack, &key),
            Action::StepInIndex(idx) => step_in_index(&mut stack, idx),
            Action::Fin => fin(&mut stack),
            Action::Print => Ok(()),
            Action::Quote(text) => {
                match make_safe_scalar(&text) {
                    Ok(quoted) => println!("{quoted}"),
                    Err(e) => eprintln!("{e}"),
                }
                continue;
            }
            Action::Stop => break,
        };

        match err {
            Ok(()) => {
                io.clear_screen().into_diagnostic()?;
                print(contents, &stack);
            }
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}

fn print(contents: &str, stack: &Stack<'_>) {
    let Some(&node) = stack.last() else {
        return;
    };
    eprintln!("\x1B[1mdepth {}\x1B[m", stack.len() - 1);
    match node {
        Yaml::Scalar(text) => match span_in(contents, text) {
            Some(span) => eprintln!(
                "{:?}",
                miette::Error::new(CurrentNode {
                    src: NamedSource::new("<input>", contents.to_owned()),
                    span,
                })
            ),
            // Values filled in for missing ones are not part of the input.
            None => eprintln!("{text} (implicit)"),
        },
        Yaml::Sequence(seq) => eprintln!("sequence of {} elements", seq.len()),
        Yaml::Mapping(map) => {
            eprintln!("mapping of {} pairs:", map.len());
            for key in map.keys() {
                eprintln!("  {key}");
            }
        }
        Yaml::BadValue => eprintln!("bad value"),
    }
}

/// Locate `text` in `contents`, if it is a slice of it.
fn span_in(contents: &str, text: &str) -> Option<SourceSpan> {
    let start = (text.as_ptr() as usize).checked_sub(contents.as_ptr() as usize)?;
    (start + text.len() <= contents.len()).then(|| (start, text.len()).into())
}

fn step_in_key<'a>(stack: &mut Stack<'a>, key: &str) -> Result<()> {
    let Some(&node) = stack.last() else {
        bail!("Nothing loaded");
    };
    match node {
        Yaml::Mapping(map) => do_step_in_key(stack, map, key),
        _ => bail!("Not in a mapping"),
    }
}

fn step_in_index<'a>(stack: &mut Stack<'a>, idx: usize) -> Result<()> {
    let Some(&node) = stack.last() else {
        bail!("Nothing loaded");
    };
    match node {
        Yaml::Sequence(seq) => do_step_in_seq(stack, seq, idx),
        _ => bail!("Not in a sequence"),
    }
}

fn fin(stack: &mut Stack<'_>) -> Result<()> {
    if stack.len() > 1 {
        stack.pop();
        Ok(())
    } else {
        bail!("Already at the top-level");
    }
}

fn do_step_in_seq<'a>(stack: &mut Stack<'a>, seq: &'a YamlSeq<'a>, idx: usize) -> Result<()> {
    if let Some(node) = seq.get(idx) {
        stack.push(node);
        Ok(())
    } else {
        bail!("Sequence has {} elements", seq.len());
    }
}

fn do_step_in_key<'a>(stack: &mut Stack<'a>, map: &'a YamlMap<'a>, key: &str) -> Result<()> {
    if let Some(node) = map.get(key) {
        stack.push(node);
        Ok(())
    } else {
        bail!("No key `{key}` in this mapping");
    }
}

type Stack<'a> = Vec<&'a Yaml<'a>>;
type YamlMap<'a> = LinkedHashMap<&'a str, Yaml<'a>>;
type YamlSeq<'a> = Vec<Yaml<'a>>;

#[derive(Error, Debug, Diagnostic)]
#[error("")]
#[diagnostic()]
pub struct CurrentNode {
    #[source_code]
    src: NamedSource<String>,
    #[label("Current node")]
    span: SourceSpan,
}

#[derive(Error, Debug, Diagnostic)]
#[error("{info}")]
#[diagnostic(code(yamlet::load))]
pub struct LoadErr {
    info: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    span: SourceSpan,
    #[help]
    kind: String,
}

impl LoadErr {
    fn new(filename: &str, contents: &str, err: &ScanError) -> Self {
        let index = err.marker().index();
        let len = usize::from(index < contents.len());
        Self {
            info: err.info().to_owned(),
            src: NamedSource::new(filename, contents.to_owned()),
            span: (index, len).into(),
            kind: format!(
                "{:?} at line {} column {}",
                err.kind(),
                err.marker().line(),
                err.marker().col()
            ),
        }
    }
}

enum Action {
    StepInKey(String),
    StepInIndex(usize),
    Fin,
    Print,
    Quote(String),
    Stop,
}

const HELP: &str = "commands: k <key>, i <index>, up, p, quote <text>, q";

fn read_action(io: &mut DefaultEditor) -> Result<Action> {
    loop {
        match io.readline(">> ") {
            Ok(line) => {
                let _ = io.add_history_entry(line.as_str());
                let line = line.trim_start();
                let (command, arg) = line.split_once(' ').unwrap_or((line.trim_end(), ""));
                match command {
                    "q" | "quit" => return Ok(Action::Stop),
                    "k" | "key" => return Ok(Action::StepInKey(arg.trim().to_owned())),
                    "i" | "index" => match arg.trim().parse() {
                        Ok(idx) => return Ok(Action::StepInIndex(idx)),
                        Err(_) => eprintln!("`{arg}` is not an index"),
                    },
                    "fin" | "out" | "up" => return Ok(Action::Fin),
                    "p" | "print" => return Ok(Action::Print),
                    "quote" => return Ok(Action::Quote(arg.to_owned())),
                    _ => eprintln!("{HELP}"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(Action::Stop),
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
}

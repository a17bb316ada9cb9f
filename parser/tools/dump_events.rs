use std::env;
use std::fs;
use std::process::ExitCode;

use yamlet_parser::{Event, EventReceiver, Parser, ScanError};

#[derive(Debug, Default)]
struct EventSink<'a> {
    events: Vec<Event<'a>>,
}

impl EventSink<'_> {
    fn print_last(&self) {
        if let Some(ev) = self.events.last() {
            eprintln!("      \x1B[;34m\u{21B3} {ev}\x1B[;m");
        }
    }
}

impl<'a> EventReceiver<'a> for EventSink<'a> {
    fn on_document_start(&mut self) {
        self.events.on_document_start();
        self.print_last();
    }

    fn on_document_end(&mut self) {
        self.events.on_document_end();
        self.print_last();
    }

    fn on_sequence_start(&mut self) {
        self.events.on_sequence_start();
        self.print_last();
    }

    fn on_sequence_end(&mut self) {
        self.events.on_sequence_end();
        self.print_last();
    }

    fn on_mapping_start(&mut self) {
        self.events.on_mapping_start();
        self.print_last();
    }

    fn on_mapping_end(&mut self) {
        self.events.on_mapping_end();
        self.print_last();
    }

    fn on_key(&mut self, key: &'a str) -> bool {
        self.events.on_key(key);
        self.print_last();
        true
    }

    fn on_scalar(&mut self, value: &'a str) -> bool {
        self.events.on_scalar(value);
        self.print_last();
        true
    }

    fn on_error(&mut self, error: &ScanError) {
        eprintln!("      \x1B[;31m\u{2717} {error}\x1B[;m");
    }
}

fn main() -> ExitCode {
    let args: Vec<_> = env::args().collect();
    let [_, path] = args.as_slice() else {
        eprintln!("Usage: dump_events <file.yaml>");
        return ExitCode::FAILURE;
    };
    let s = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut sink = EventSink::default();
    match Parser::new(&s, &mut sink).parse() {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

use yamlet_parser::{parse_str, ErrorKind, Event, Marker, ParseStatus, Parser, ScanError};

/// Run the parser through the string, expecting it to fail.
fn run_parser_err(input: &str) -> ScanError {
    let mut events: Vec<Event> = vec![];
    match parse_str(input, &mut events) {
        Ok(status) => panic!("expected an error, got {status:?} with {events:?}"),
        Err(err) => err,
    }
}

/// Check the kind, marker and message of the error the parser reports for `input`.
fn assert_error(input: &str, kind: ErrorKind, marker: (usize, usize, usize), info: &str) {
    let err = run_parser_err(input);
    assert_eq!(err.kind(), kind, "{input:?}: {err}");
    assert_eq!(
        *err.marker(),
        Marker::new(marker.0, marker.1, marker.2),
        "{input:?}: {err}"
    );
    assert_eq!(err.info(), info, "{input:?}");
}

#[test]
fn test_tabs() {
    assert_error(
        "a:\n\tb: 1\n",
        ErrorKind::Unsupported,
        (3, 2, 1),
        "avoid tabs in YAML text",
    );
    assert_error(
        "a:\t1",
        ErrorKind::Unsupported,
        (2, 1, 3),
        "avoid tabs in YAML text",
    );
    // Even in comments.
    assert_error(
        "a: 1 # x\ty",
        ErrorKind::Unsupported,
        (8, 1, 9),
        "avoid tabs in YAML text",
    );
}

#[test]
fn test_tabs_in_quoted_scalars() {
    let mut events = vec![];
    parse_str("a: 'x\ty'", &mut events).unwrap();
    assert_eq!(events[3], Event::Scalar("x\ty"));
}

#[test]
fn test_unsupported_indicators() {
    assert_error(
        "a: |\n  text",
        ErrorKind::Unsupported,
        (3, 1, 4),
        "`|` directive not supported",
    );
    assert_error(
        "a: >\n  text",
        ErrorKind::Unsupported,
        (3, 1, 4),
        "`>` directive not supported",
    );
    assert_error(
        "base: &anchor 1",
        ErrorKind::Unsupported,
        (6, 1, 7),
        "`&` directive not supported",
    );
    assert_error(
        "- *alias",
        ErrorKind::Unsupported,
        (2, 1, 3),
        "`*` directive not supported",
    );
    assert_error(
        "!tag value",
        ErrorKind::Unsupported,
        (0, 1, 1),
        "`!` directive not supported",
    );
    assert_error(
        "? complex key",
        ErrorKind::Unsupported,
        (0, 1, 1),
        "`?` directive not supported",
    );
    assert_error(
        "a: `cmd`",
        ErrorKind::Unsupported,
        (3, 1, 4),
        "``` directive not supported",
    );
}

#[test]
fn test_unterminated_scalar() {
    assert_error(
        "key: \"abc",
        ErrorKind::UnterminatedScalar,
        (5, 1, 6),
        "unterminated quoted scalar <\"abc...>",
    );
    assert_error(
        "a: 1\nb: 'abcdefghijklmnopq\nrst",
        ErrorKind::UnterminatedScalar,
        (8, 2, 4),
        "unterminated quoted scalar <'abcdefghijkl...>",
    );
}

#[test]
fn test_unterminated_scalar_preview_keeps_characters_whole() {
    // The preview would end in the middle of the 6th `é`.
    let err = run_parser_err("'aééééééééé");
    assert_eq!(err.kind(), ErrorKind::UnterminatedScalar);
    assert_eq!(err.info(), "unterminated quoted scalar <'aééééé...>");
}

#[test]
fn test_unbalanced_closures() {
    assert_error(
        "}",
        ErrorKind::UnbalancedClosure,
        (0, 1, 1),
        "too many closing braces or brackets",
    );
    assert_error(
        "a: [1, 2]]",
        ErrorKind::UnbalancedClosure,
        (9, 1, 10),
        "too many closing braces or brackets",
    );
    assert_error(
        "[1}",
        ErrorKind::UnbalancedClosure,
        (2, 1, 3),
        "found `}` while expecting `]`",
    );
    assert_error(
        "[1, 2",
        ErrorKind::UnbalancedClosure,
        (5, 1, 6),
        "unexpected end of input, expected `]`",
    );
    assert_error(
        "a: {b: [1]\n",
        ErrorKind::UnbalancedClosure,
        (11, 2, 1),
        "unexpected end of input, expected `}`",
    );
}

#[test]
fn test_no_end_event_after_unbalanced_closure() {
    let mut events = vec![];
    assert!(parse_str("}", &mut events).is_err());
    assert_eq!(events, [Event::DocumentStart]);
}

#[test]
fn test_malformed_document_marker() {
    assert_error(
        "--\n",
        ErrorKind::MalformedDocumentMarker,
        (0, 1, 1),
        "expected a `---` document marker",
    );
    assert_error(
        "a: 1\n-- b",
        ErrorKind::MalformedDocumentMarker,
        (5, 2, 1),
        "expected a `---` document marker",
    );
}

#[test]
fn test_block_entry_in_flow() {
    assert_error(
        "[a, - b]",
        ErrorKind::Unsupported,
        (4, 1, 5),
        "block sequence entries are not allowed in flow collections",
    );
}

#[test]
fn test_flow_nesting_limit() {
    let err = run_parser_err(&"[".repeat(40));
    assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
    assert_eq!(err.info(), "collections nested deeper than 32");
    // The 33rd bracket is the one too many.
    assert_eq!(err.marker().index(), 32);

    let deep = format!("{}{}", "[".repeat(40), "]".repeat(40));
    let mut events = vec![];
    let status = Parser::new(&deep, &mut events)
        .max_depth(64)
        .parse()
        .unwrap();
    assert_eq!(status, ParseStatus::Complete);
    assert_eq!(events.len(), 82);
}

#[test]
fn test_block_nesting_limit() {
    let nested = |lines: usize| {
        (0..lines)
            .map(|i| format!("{}k{i}:\n", " ".repeat(i)))
            .collect::<String>()
    };

    let shallow = nested(20);
    let mut events = vec![];
    assert!(parse_str(&shallow, &mut events).is_ok());

    let err = run_parser_err(&nested(40));
    assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
    // The mapping of the root holds the first 32 levels.
    assert_eq!(err.marker().line(), 33);
}

/// Return how deep the collection events of `events` go.
fn max_nesting(events: &[Event]) -> usize {
    let mut depth = 0usize;
    let mut max = 0;
    for event in events {
        match event {
            Event::SequenceStart | Event::MappingStart => {
                depth += 1;
                max = max.max(depth);
            }
            Event::SequenceEnd | Event::MappingEnd => depth -= 1,
            _ => {}
        }
    }
    max
}

#[test]
fn test_implicit_mappings_count_toward_depth() {
    let input = "- a:\n  - b:\n    - c: 1\n";

    let mut events = vec![];
    let status = Parser::new(input, &mut events).max_depth(6).parse().unwrap();
    assert_eq!(status, ParseStatus::Complete);
    assert_eq!(max_nesting(&events), 6);

    let mut events = vec![];
    let err = Parser::new(input, &mut events)
        .max_depth(5)
        .parse()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
    assert_eq!(err.marker().line(), 3);
    assert!(max_nesting(&events) <= 5);
}

#[test]
fn test_empty_sequence_entries() {
    assert_error(
        "- a\n-\n- b\n",
        ErrorKind::Unsupported,
        (4, 2, 1),
        "empty sequence entries are not supported",
    );
    assert_error(
        "-\n  b: 1\n",
        ErrorKind::Unsupported,
        (0, 1, 1),
        "empty sequence entries are not supported",
    );
    assert_error(
        "a:\n  - # later\n",
        ErrorKind::Unsupported,
        (5, 2, 3),
        "empty sequence entries are not supported",
    );
    // The last dash of the indentation is the empty one.
    assert_error(
        "- - \n",
        ErrorKind::Unsupported,
        (2, 1, 3),
        "empty sequence entries are not supported",
    );
}

#[test]
fn test_zero_depth() {
    let mut events = vec![];
    assert!(Parser::new("plain", &mut events).max_depth(0).parse().is_ok());

    let mut events = vec![];
    let err = Parser::new("a: 1", &mut events)
        .max_depth(0)
        .parse()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
}

#[test]
fn test_error_display() {
    let err = run_parser_err("a: [1, 2]]");
    assert_eq!(
        err.to_string(),
        "too many closing braces or brackets at byte 9 line 1 column 10"
    );
}

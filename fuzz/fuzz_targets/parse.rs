#![no_main]

use libfuzzer_sys::fuzz_target;
use yamlet_parser::{parse_str, Event, EventReceiver, ParseStatus};

struct Nothing;

impl EventReceiver<'_> for Nothing {}

/// Check that the events start and end a document and nest their collections properly.
fn assert_balanced(events: &[Event]) {
    assert_eq!(events.first(), Some(&Event::DocumentStart));
    assert_eq!(events.last(), Some(&Event::DocumentEnd));
    let mut open = vec![];
    for event in &events[1..events.len() - 1] {
        match event {
            Event::SequenceStart | Event::MappingStart => open.push(event),
            Event::SequenceEnd => assert_eq!(open.pop(), Some(&Event::SequenceStart)),
            Event::MappingEnd => assert_eq!(open.pop(), Some(&Event::MappingStart)),
            Event::DocumentStart | Event::DocumentEnd => panic!("nested document: {events:?}"),
            Event::Key(_) | Event::Scalar(_) => {}
        }
    }
    assert!(open.is_empty(), "unclosed collections: {open:?}");
}

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut events = vec![];
        let collected = parse_str(s, &mut events);
        let ignored = parse_str(s, &mut Nothing);

        assert_eq!(collected, ignored);
        if collected == Ok(ParseStatus::Complete) {
            assert_balanced(&events);
        }
    }
});

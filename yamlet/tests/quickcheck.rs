#[macro_use]
extern crate quickcheck;

use quickcheck::TestResult;

use yamlet::{analyze_special_chars, make_key_value_line, make_safe_scalar, parse_str, Event};

/// Bytes that never force a scalar to be quoted.
fn is_safe(c: char) -> bool {
    matches!(c, ' '..='z') && !"!\"#$%&'*,-/:<=>?@[\\]`".contains(c)
}

fn is_pre_quoted(s: &str) -> bool {
    s.len() > 2
        && ((s.starts_with('\'') && s.ends_with('\'')) || (s.starts_with('"') && s.ends_with('"')))
}

quickcheck! {
    fn test_safe_scalars_are_left_alone(s: String) -> TestResult {
        if !s.chars().all(is_safe) {
            return TestResult::discard();
        }
        TestResult::from_bool(make_safe_scalar(&s).ok().as_deref() == Some(s.as_str()))
    }

    fn test_unsafe_scalars_are_quoted(s: String) -> TestResult {
        if s.chars().all(is_safe) || is_pre_quoted(&s) || (s.contains('\'') && s.contains('"')) {
            return TestResult::discard();
        }
        let quote = if s.contains('\'') { '"' } else { '\'' };
        let expected = format!("{quote}{s}{quote}");
        match make_safe_scalar(&s) {
            Ok(quoted) => TestResult::from_bool(quoted == expected),
            Err(err) => TestResult::error(err.to_string()),
        }
    }

    fn test_analysis_agrees_with_quoting(s: String) -> TestResult {
        let analysis = analyze_special_chars(&s);
        let expected = !s.is_empty() && !is_pre_quoted(&s) && !s.chars().all(is_safe);
        TestResult::from_bool(analysis.has_special_chars() == expected)
    }

    fn test_encode_then_parse(s: String) -> TestResult {
        // A nil byte ends the input of the parser. Mixed quotes cannot be encoded, and pre-quoted
        // scalars are written as is.
        if s.contains('\0') || is_pre_quoted(&s) || (s.contains('\'') && s.contains('"')) {
            return TestResult::discard();
        }
        // Blanks around bare scalars are not part of them.
        let encoded = make_safe_scalar(&s).ok();
        if encoded.as_deref() == Some(s.as_str()) && (s.is_empty() || s.trim() != s) {
            return TestResult::discard();
        }

        let line = match make_key_value_line("key", &s) {
            Ok(line) => line,
            Err(err) => return TestResult::error(err.to_string()),
        };
        let mut events = vec![];
        if let Err(err) = parse_str(&line, &mut events) {
            return TestResult::error(format!("{line:?}: {err}"));
        }
        TestResult::from_bool(
            events
                == [
                    Event::DocumentStart,
                    Event::MappingStart,
                    Event::Key("key"),
                    Event::Scalar(&s),
                    Event::MappingEnd,
                    Event::DocumentEnd,
                ],
        )
    }
}

//! JUnit XML rendering of threshold outcomes.
//!
//! Every threshold of every metric becomes one `<testcase>`; failed thresholds
//! carry a `<failure>` child. CI systems pick the file up like any other test
//! report.

use quick_xml::escape::escape;
use tracing::debug;

use crate::report::ReportCase;
use crate::results::RunResult;

/// Suite name used when the caller does not supply one.
pub const DEFAULT_SUITE_NAME: &str = "k6 thresholds";

/// Build a JUnit XML document from the thresholds in `result`.
///
/// The output is deterministic: the same input always renders the same bytes.
pub fn build_junit_report(suite_name: &str, result: &RunResult) -> String {
    let cases = result.cases();
    let failures = cases.iter().filter(|c| !c.passed).count();
    debug!(tests = cases.len(), failures, "rendering JUnit report");
    render(suite_name, &cases, failures)
}

fn render(suite_name: &str, cases: &[ReportCase], failures: usize) -> String {
    let tests = cases.len();

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\"?>\n");
    out.push_str(&format!(
        "<testsuites tests=\"{tests}\" failures=\"{failures}\">\n"
    ));
    out.push_str(&format!(
        "    <testsuite name=\"{}\" tests=\"{tests}\" failures=\"{failures}\">\n",
        attr_value(suite_name)
    ));
    for case in cases {
        out.push_str("        ");
        out.push_str(&render_case(case));
        out.push('\n');
    }
    out.push_str("    </testsuite>\n");
    out.push_str("</testsuites>\n");
    out
}

fn render_case(case: &ReportCase) -> String {
    let name = attr_value(&case.name);
    if case.passed {
        format!("<testcase name=\"{name}\" />")
    } else {
        format!("<testcase name=\"{name}\"><failure message=\"failed\" /></testcase>")
    }
}

/// Escape an attribute value, replacing characters XML 1.0 cannot carry
/// (C0 controls other than tab, newline and carriage return; U+FFFE, U+FFFF)
/// with U+FFFD.
fn attr_value(raw: &str) -> String {
    let legal: String = raw
        .chars()
        .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
        .collect();
    escape(legal.as_str()).into_owned()
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    fn result_from(doc: &str) -> RunResult {
        RunResult::from_json(doc).expect("test document should parse")
    }

    fn single_threshold(ok: bool) -> RunResult {
        result_from(&format!(
            r#"{{"metrics": {{"http_req_duration": {{"thresholds": {{"p(95)<500": {{"ok": {ok}}}}}}}}}}}"#
        ))
    }

    /// Parsed view of a report, read back with a real XML parser.
    #[derive(Debug, Default)]
    struct Parsed {
        suites_attrs: Vec<(String, String)>,
        suite_attrs: Vec<(String, String)>,
        case_names: Vec<String>,
        failure_count: usize,
    }

    fn attrs(e: &quick_xml::events::BytesStart) -> Vec<(String, String)> {
        e.attributes()
            .map(|a| {
                let a = a.expect("attribute should be well-formed");
                (
                    String::from_utf8(a.key.as_ref().to_vec()).expect("utf8 key"),
                    a.unescape_value().expect("value should unescape").into_owned(),
                )
            })
            .collect()
    }

    fn parse(xml: &str) -> Parsed {
        let mut reader = Reader::from_str(xml);
        let mut parsed = Parsed::default();
        loop {
            match reader.read_event().expect("report should be well-formed XML") {
                Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                    b"testsuites" => parsed.suites_attrs = attrs(&e),
                    b"testsuite" => parsed.suite_attrs = attrs(&e),
                    b"testcase" => {
                        let name = attrs(&e)
                            .into_iter()
                            .find(|(k, _)| k == "name")
                            .map(|(_, v)| v)
                            .expect("testcase should have a name");
                        parsed.case_names.push(name);
                    }
                    b"failure" => parsed.failure_count += 1,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }
        parsed
    }

    fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> &'a str {
        attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or_else(|| panic!("missing attribute {key}"))
    }

    #[test]
    fn passing_threshold_has_no_failure() {
        let xml = build_junit_report(DEFAULT_SUITE_NAME, &single_threshold(true));
        assert!(xml.starts_with("<?xml version=\"1.0\"?>"));
        assert!(xml.contains("<testcase name=\"http_req_duration + p(95)&lt;500\" />"));
        assert!(!xml.contains("<failure"));

        let parsed = parse(&xml);
        assert_eq!(parsed.case_names, vec!["http_req_duration + p(95)<500"]);
        assert_eq!(attr(&parsed.suites_attrs, "tests"), "1");
        assert_eq!(attr(&parsed.suites_attrs, "failures"), "0");
    }

    #[test]
    fn failing_threshold_has_failure_child() {
        let xml = build_junit_report(DEFAULT_SUITE_NAME, &single_threshold(false));
        assert!(xml.contains("<failure message=\"failed\" />"));

        let parsed = parse(&xml);
        assert_eq!(parsed.failure_count, 1);
        assert_eq!(attr(&parsed.suites_attrs, "tests"), "1");
        assert_eq!(attr(&parsed.suites_attrs, "failures"), "1");
        assert_eq!(attr(&parsed.suite_attrs, "failures"), "1");
    }

    #[test]
    fn mixed_outcomes_count_only_failures() {
        let result = result_from(
            r#"{"metrics": {
                "http_req_duration": {"thresholds": {"p(95)<500": {"ok": true}}},
                "http_req_failed": {"thresholds": {"rate<0.01": {"ok": false}}}
            }}"#,
        );
        let parsed = parse(&build_junit_report("api", &result));
        assert_eq!(attr(&parsed.suites_attrs, "tests"), "2");
        assert_eq!(attr(&parsed.suites_attrs, "failures"), "1");
        assert_eq!(attr(&parsed.suite_attrs, "tests"), "2");
        assert_eq!(attr(&parsed.suite_attrs, "failures"), "1");
        assert_eq!(parsed.failure_count, 1);
    }

    #[test]
    fn case_count_matches_threshold_count() {
        let result = result_from(
            r#"{"metrics": {
                "a": {"thresholds": {"avg<1": {"ok": true}, "max<2": {"ok": true}, "p(99)<3": {"ok": false}}},
                "b": {"values": {"count": 3}},
                "c": {"thresholds": {}},
                "d": {"thresholds": {"count>0": {"ok": true}}}
            }}"#,
        );
        let parsed = parse(&build_junit_report("suite", &result));
        assert_eq!(parsed.case_names.len(), 4);
        assert_eq!(attr(&parsed.suites_attrs, "tests"), "4");
        assert_eq!(attr(&parsed.suite_attrs, "tests"), "4");
    }

    #[test]
    fn no_thresholds_renders_empty_suite() {
        let result = result_from(r#"{"metrics": {"iterations": {"type": "counter"}}}"#);
        let xml = build_junit_report("empty", &result);
        assert!(xml.contains("<testsuites tests=\"0\" failures=\"0\">"));
        assert!(xml.contains(
            "<testsuite name=\"empty\" tests=\"0\" failures=\"0\">\n    </testsuite>"
        ));
        assert!(parse(&xml).case_names.is_empty());
    }

    #[test]
    fn rendering_is_idempotent() {
        let result = result_from(
            r#"{"metrics": {
                "z": {"thresholds": {"avg<1": {"ok": false}}},
                "a": {"thresholds": {"avg<1": {"ok": true}}}
            }}"#,
        );
        let first = build_junit_report("suite", &result);
        let second = build_junit_report("suite", &result);
        assert_eq!(first, second);
    }

    #[test]
    fn escapes_special_characters_in_names() {
        let result = result_from(
            r#"{"metrics": {"http_req_duration{name:\"a&b\"}": {"thresholds": {"p(95)>=1": {"ok": true}}}}}"#,
        );
        let xml = build_junit_report("<suite> & \"co\"", &result);
        let parsed = parse(&xml);
        assert_eq!(attr(&parsed.suite_attrs, "name"), "<suite> & \"co\"");
        assert_eq!(
            parsed.case_names,
            vec!["http_req_duration{name:\"a&b\"} + p(95)>=1"]
        );
    }

    #[test]
    fn control_characters_are_replaced() {
        let result = result_from(
            r#"{"metrics": {"bad\u0001metric": {"thresholds": {"avg<1": {"ok": false}}}}}"#,
        );
        let xml = build_junit_report("suite\u{1b}[0m", &result);
        assert!(!xml.contains('\u{1}'));
        assert!(!xml.contains('\u{1b}'));

        let parsed = parse(&xml);
        assert_eq!(parsed.case_names, vec!["bad\u{FFFD}metric + avg<1"]);
        assert_eq!(attr(&parsed.suite_attrs, "name"), "suite\u{FFFD}[0m");
        assert_eq!(parsed.failure_count, 1);
    }

    #[test]
    fn tabs_and_newlines_are_kept() {
        assert!(is_xml_char('\t'));
        assert!(is_xml_char('\n'));
        assert!(is_xml_char('\r'));
        assert!(!is_xml_char('\u{0}'));
        assert!(!is_xml_char('\u{FFFE}'));
        assert_eq!(attr_value("a\u{7}b"), "a\u{FFFD}b");
    }
}

use anyhow::Result;
use roxmltree::Node;

use super::{parse_attr, parse_required_attr};
use crate::core::{TestEntry, TestReport};

pub(super) fn parse(suite: Node<'_, '_>) -> Result<TestReport> {
    let tests = parse_required_attr::<u64>(suite, "tests")?;
    let failures = parse_attr::<u64>(suite, "failures")?.unwrap_or(0);
    let errors = parse_attr::<u64>(suite, "errors")?.unwrap_or(0);
    let skipped = match parse_attr::<u64>(suite, "skip")? {
        Some(n) => n,
        None => parse_attr::<u64>(suite, "skipped")?.unwrap_or(0),
    };
    let time = parse_attr::<f64>(suite, "time")?.unwrap_or(0.0);
    let timestamp = suite.attribute("timestamp").unwrap_or("unknown").to_string();

    let entries = suite
        .children()
        .filter(|n| n.has_tag_name("testcase"))
        .filter_map(entry_for_case)
        .collect();

    Ok(TestReport {
        tests,
        failures,
        errors,
        skipped,
        time,
        timestamp,
        entries,
    })
}

/// Only the first element child decides the outcome of a case.
fn entry_for_case(case: Node<'_, '_>) -> Option<TestEntry> {
    let result = case.children().find(|n| n.is_element())?;
    let tag = result.tag_name().name();
    if tag.eq_ignore_ascii_case("skipped") {
        return None;
    }
    let status = case.attribute("status").unwrap_or(tag).to_string();
    let raw = result.text().unwrap_or("");
    Some(TestEntry {
        status,
        class_name: case.attribute("classname").unwrap_or("").to_string(),
        test_name: case.attribute("name").unwrap_or("").to_string(),
        text: html_escape::decode_html_entities(raw).into_owned(),
    })
}

use std::io::Write;

use similar::{ChangeTag, TextDiff};
use tabwriter::TabWriter;

#[cfg(feature = "color")]
use colored::Colorize;

use crate::common::{
    data::{ClosestMatch, RequestSummary},
    error::Error,
    util::{get_plural, quote_if_whitespace},
};

const QUOTED_TEXT: &str = "quoted for better readability";

/// Fails the current test with the long form of `err`.
pub(crate) fn fail_with(err: &Error) -> ! {
    panic!("{}", render_error(err))
}

/// Renders an error with everything a failing test should show: the short message, the
/// requests involved and, for missed matches, the closest pending request.
pub fn render_error(err: &Error) -> String {
    let mut output = String::new();
    output.push_str(&err.to_string());
    output.push('\n');

    match err {
        Error::NoMatch {
            pending, closest, ..
        } => {
            if let Some(closest) = closest {
                output.push('\n');
                output.push_str(&render_closest_match(closest));
            }
            output.push('\n');
            output.push_str(&render_request_table("Pending requests", pending));
        }
        Error::AmbiguousMatch { requests, .. } | Error::UnexpectedMatch { requests, .. } => {
            output.push('\n');
            output.push_str(&render_request_table("Matching requests", requests));
        }
        Error::UnresolvedRequests { requests } => {
            output.push('\n');
            output.push_str(&render_request_table("Unresolved requests", requests));
        }
        Error::AlreadyResolved { .. } | Error::InvalidResponse(_) => {}
    }

    output
}

fn render_request_table(title: &str, requests: &[RequestSummary]) -> String {
    let mut tw = TabWriter::new(vec![]);

    let _ = writeln!(
        tw,
        "{} ({} {}):",
        title,
        requests.len(),
        get_plural(requests.len(), "request", "requests")
    );

    if requests.is_empty() {
        let _ = writeln!(tw, "\t<none>");
        return into_string(tw);
    }

    let _ = writeln!(tw, "\t#\tMethod\tURL\tHeaders");
    for (idx, req) in requests.iter().enumerate() {
        let url = match quote_if_whitespace(&req.url) {
            (url, true) => format!("{} ({})", url, QUOTED_TEXT),
            (url, false) => url,
        };

        let headers = if req.header_names.is_empty() {
            "-".to_string()
        } else {
            req.header_names.join(", ")
        };

        let _ = writeln!(tw, "\t{}\t{}\t{}\t{}", idx + 1, req.method, url, headers);
    }

    into_string(tw)
}

fn render_closest_match(closest: &ClosestMatch) -> String {
    let mut tw = TabWriter::new(vec![]);

    let _ = writeln!(tw, "{}", "-".repeat(60));
    let _ = writeln!(tw, "Closest pending request (request #{}):", closest.request.id);
    let _ = writeln!(tw, "{}", "-".repeat(60));
    let _ = writeln!(tw, "Expected:\t{}", closest.expected);
    let _ = writeln!(tw, "Received:\t{}", closest.request);
    let _ = writeln!(tw, "Distance:\t{}", closest.distance);
    let _ = writeln!(tw, "Diff:\t{}", diff_inline(&closest.expected, &closest.request.url));

    into_string(tw)
}

/// Character level diff of `expected` against `actual`. Removed characters are wrapped in
/// `[-…-]`, inserted ones in `{+…+}`.
pub(crate) fn diff_inline(expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_chars(expected, actual);
    let mut output = String::new();

    for change in diff.iter_all_changes() {
        let value = change.to_string_lossy();
        match change.tag() {
            ChangeTag::Equal => output.push_str(&value),
            ChangeTag::Delete => output.push_str(&removed(&value)),
            ChangeTag::Insert => output.push_str(&added(&value)),
        }
    }

    merge_adjacent_markers(&output)
}

#[cfg(feature = "color")]
fn removed(s: &str) -> String {
    format!("[-{}-]", s).red().to_string()
}

#[cfg(not(feature = "color"))]
fn removed(s: &str) -> String {
    format!("[-{}-]", s)
}

#[cfg(feature = "color")]
fn added(s: &str) -> String {
    format!("{{+{}+}}", s).green().to_string()
}

#[cfg(not(feature = "color"))]
fn added(s: &str) -> String {
    format!("{{+{}+}}", s)
}

// Per-character markers are hard to read, so runs like "[-a-][-b-]" collapse to "[-ab-]".
fn merge_adjacent_markers(s: &str) -> String {
    s.replace("-][-", "").replace("+}{+", "")
}

fn into_string(mut tw: TabWriter<Vec<u8>>) -> String {
    let _ = tw.flush();
    match tw.into_inner() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    }
}

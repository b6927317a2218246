//! Template rendering.
//!
//! A template is plain text with any number of `{{date:FORMAT}}` tokens.
//! Rendering replaces each token with the current time formatted by
//! [`moment::format`]; everything else is copied unchanged.
//!
//! The current time comes from a [`Clock`] so rendering stays deterministic
//! under test:
//!
//! ```ignore
//! let clock = FixedClock::parse("2024-03-05T10:00:00+00:00")?;
//! assert_eq!(render("{{date:YYYY}}", &clock.now()), "2024");
//! ```

pub mod moment;

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, Local};
use regex::{Captures, Regex};

use crate::error::Error;
use crate::Result;

/// `{{ date : FORMAT }}`, case-insensitive tag, first `}}` closes the token.
/// The format itself never crosses a line break.
static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\{\{\s*date\s*:\s*(.*?)[ \t]*\}\}").expect("date token pattern is valid")
});

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    /// Parse an RFC 3339 timestamp such as `2024-03-05T09:30:00+01:00`.
    pub fn parse(timestamp: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(timestamp)
            .map(FixedClock)
            .map_err(|e| Error::Config(format!("Invalid timestamp '{}': {}", timestamp, e)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Replace every date token in `template` with `now` in the token's format.
pub fn render(template: &str, now: &DateTime<FixedOffset>) -> String {
    DATE_TOKEN
        .replace_all(template, |caps: &Captures| moment::format(now, &caps[1]))
        .into_owned()
}

/// Number of date tokens in `template`.
pub fn count_tokens(template: &str) -> usize {
    DATE_TOKEN.find_iter(template).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> FixedClock {
        FixedClock::parse("2024-03-05T09:41:00+00:00").unwrap()
    }

    #[test]
    fn test_no_tokens_is_identity() {
        let now = clock().now();
        for template in ["", "plain text", "---\naliases: []\n---\n", "{{time:HH}}", "{date:YYYY}"] {
            assert_eq!(render(template, &now), template);
            assert_eq!(count_tokens(template), 0);
        }
    }

    #[test]
    fn test_token_free_render_is_idempotent() {
        let now = clock().now();
        let once = render("# Title\n\nbody", &now);
        assert_eq!(render(&once, &now), once);
    }

    #[test]
    fn test_basic_formats() {
        let now = clock().now();
        assert_eq!(render("{{date:YYYY-MM-DD}}", &now), "2024-03-05");
        assert_eq!(render("{{date:YYYYMMDDHHmm}}", &now), "202403050941");
    }

    #[test]
    fn test_mixed_whitespace_and_case() {
        let now = clock().now();
        assert_eq!(render("a{{date:YYYY}}b{{ date : MM }}c", &now), "a2024b03c");
        assert_eq!(render("{{DATE:DD}} {{Date :YYYY}} {{\tdate:\tMM}}", &now), "05 2024 03");
    }

    #[test]
    fn test_replaces_every_occurrence_preserving_text() {
        let now = clock().now();
        let template = "start {{date:YYYY}} middle {{date:MM}} {{date:DD}} end";
        assert_eq!(count_tokens(template), 3);
        assert_eq!(render(template, &now), "start 2024 middle 03 05 end");
    }

    #[test]
    fn test_first_closing_braces_end_the_format() {
        let now = clock().now();
        assert_eq!(render("{{date:YYYY}}}}", &now), "2024}}");
        assert_eq!(count_tokens("{{date:YYYY}} {{date:MM}}"), 2);
    }

    #[test]
    fn test_tokens_do_not_span_lines() {
        let now = clock().now();
        let template = "{{date:YYYY\n}}";
        assert_eq!(render(template, &now), template);
    }

    #[test]
    fn test_empty_format_falls_back_to_default() {
        let now = clock().now();
        assert_eq!(
            render("[{{date:}}] [{{date: }}]", &now),
            "[2024-03-05T09:41:00+00:00] [2024-03-05T09:41:00+00:00]"
        );
    }

    #[test]
    fn test_localized_formats() {
        let now = clock().now();
        assert_eq!(
            render("{{date:L}}|{{date:LL}}|{{date:LT}}|{{date:LLLL}}", &now),
            "03/05/2024|March 5, 2024|9:41 AM|Tuesday, March 5, 2024 9:41 AM"
        );
    }

    #[test]
    fn test_default_template() {
        let now = clock().now();
        let rendered = render(crate::config::DEFAULT_TEMPLATE, &now);
        assert!(rendered.starts_with("---\ndate: 2024-03-05\naliases: []\n---\n"));
    }

    #[test]
    fn test_fixed_clock_parse_error() {
        assert!(matches!(FixedClock::parse("yesterday"), Err(Error::Config(_))));
    }
}

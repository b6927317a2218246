//! moment.js-style date formatting on top of chrono.
//!
//! Templates written for the host use moment format strings (`YYYY-MM-DD`,
//! `Do MMMM`, `HH:mm`) rather than strftime, so patterns are tokenized here
//! and each token is rendered from the chrono value. Unknown characters pass
//! through unchanged; nothing in a pattern is ever an error.
//!
//! Localized tokens (`L`, `LL`, `LT`, ...) are expanded to their en-locale
//! patterns before tokenizing, and an empty pattern means [`DEFAULT_FORMAT`].

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Timelike};

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const WEEKDAYS: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

/// Pattern used when the format is empty.
pub const DEFAULT_FORMAT: &str = "YYYY-MM-DDTHH:mm:ssZ";

/// en-locale expansions of the localized tokens.
const LOCALIZED: &[(&str, &str)] = &[
    ("LTS", "h:mm:ss A"),
    ("LT", "h:mm A"),
    ("LLLL", "dddd, MMMM D, YYYY h:mm A"),
    ("LLL", "MMMM D, YYYY h:mm A"),
    ("LL", "MMMM D, YYYY"),
    ("L", "MM/DD/YYYY"),
    ("llll", "ddd, MMM D, YYYY h:mm A"),
    ("lll", "MMM D, YYYY h:mm A"),
    ("ll", "MMM D, YYYY"),
    ("l", "M/D/YYYY"),
];

/// Every token the formatter understands. Matching always takes the longest.
const TOKENS: &[&str] = &[
    "YYYYYY", "YYYYY", "YYYY", "YY", "Y",
    "Qo", "Q",
    "MMMM", "MMM", "MM", "Mo", "M",
    "DDDD", "DDDo", "DDD", "DD", "Do", "D",
    "dddd", "ddd", "dd", "do", "d", "e", "E",
    "ww", "wo", "w", "WW", "Wo", "W",
    "gggg", "gg", "GGGG", "GG",
    "HH", "H", "hh", "h", "kk", "k",
    "mm", "m", "ss", "s",
    "SSSSSSSSS", "SSSSSSSS", "SSSSSSS", "SSSSSS", "SSSSS", "SSSS", "SSS", "SS", "S",
    "A", "a", "ZZ", "Z", "zz", "z", "X", "x",
    "NNNNN", "NNNN", "NNN", "NN", "N",
];

/// Format `dt` according to a moment format pattern.
pub fn format(dt: &DateTime<FixedOffset>, pattern: &str) -> String {
    let pattern = if pattern.is_empty() { DEFAULT_FORMAT } else { pattern };
    let expanded = expand_localized(pattern);

    let mut out = String::with_capacity(expanded.len() + 8);
    let mut rest = expanded.as_str();

    while let Some(c) = rest.chars().next() {
        match c {
            '[' => {
                // `[...]` is literal text, as long as no second `[` opens first
                let body = &rest[1..];
                match body.find(['[', ']']) {
                    Some(end) if body[end..].starts_with(']') => {
                        out.push_str(&body[..end]);
                        rest = &body[end + 1..];
                    }
                    _ => {
                        out.push('[');
                        rest = body;
                    }
                }
            }
            '\\' => {
                let body = &rest[1..];
                if let Some(token) = longest_token(body) {
                    out.push_str(token);
                    rest = &body[token.len()..];
                } else if let Some(next) = body.chars().next() {
                    out.push(next);
                    rest = &body[next.len_utf8()..];
                } else {
                    rest = body;
                }
            }
            _ => {
                if let Some(token) = longest_token(rest) {
                    out.push_str(&render_token(dt, token));
                    rest = &rest[token.len()..];
                } else {
                    out.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
    }

    out
}

/// Replace localized tokens with their patterns. Bracketed text and escaped
/// tokens are kept as they are for the main tokenizer.
fn expand_localized(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            let body = &rest[1..];
            if let Some(end) = body.find(['[', ']']).filter(|&end| body[end..].starts_with(']')) {
                out.push_str(&rest[..end + 2]);
                rest = &body[end + 1..];
                continue;
            }
        }

        let escaped = c == '\\';
        let after = if escaped { &rest[1..] } else { rest };
        match longest_localized(after) {
            Some((token, expansion)) => {
                if escaped {
                    out.push('\\');
                    out.push_str(token);
                } else {
                    out.push_str(expansion);
                }
                rest = &after[token.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    out
}

fn longest_localized(input: &str) -> Option<(&'static str, &'static str)> {
    LOCALIZED
        .iter()
        .copied()
        .filter(|(t, _)| input.starts_with(t))
        .max_by_key(|(t, _)| t.len())
}

fn longest_token(input: &str) -> Option<&'static str> {
    TOKENS
        .iter()
        .copied()
        .filter(|t| input.starts_with(t))
        .max_by_key(|t| t.len())
}

fn render_token(dt: &DateTime<FixedOffset>, token: &str) -> String {
    let date = dt.date_naive();
    let year = dt.year() as i64;
    let month = dt.month();
    let weekday = dt.weekday().num_days_from_sunday();

    match token {
        "YYYYYY" => {
            let sign = if year < 0 { '-' } else { '+' };
            format!("{}{:06}", sign, year.abs())
        }
        "YYYYY" => zero_fill(year, 5),
        "YYYY" => zero_fill(year, 4),
        "YY" => zero_fill(year.rem_euclid(100), 2),
        "Y" => {
            if year <= 9999 {
                zero_fill(year, 4)
            } else {
                format!("+{}", year)
            }
        }

        "Q" => ((month - 1) / 3 + 1).to_string(),
        "Qo" => ordinal((month - 1) / 3 + 1),

        "M" => month.to_string(),
        "Mo" => ordinal(month),
        "MM" => zero_fill(month as i64, 2),
        "MMM" => MONTHS[month as usize - 1][..3].to_string(),
        "MMMM" => MONTHS[month as usize - 1].to_string(),

        "D" => dt.day().to_string(),
        "Do" => ordinal(dt.day()),
        "DD" => zero_fill(dt.day() as i64, 2),
        "DDD" => dt.ordinal().to_string(),
        "DDDo" => ordinal(dt.ordinal()),
        "DDDD" => zero_fill(dt.ordinal() as i64, 3),

        "d" | "e" => weekday.to_string(),
        "do" => ordinal(weekday),
        "dd" => WEEKDAYS[weekday as usize][..2].to_string(),
        "ddd" => WEEKDAYS[weekday as usize][..3].to_string(),
        "dddd" => WEEKDAYS[weekday as usize].to_string(),
        "E" => dt.weekday().number_from_monday().to_string(),

        "w" => locale_week(date).1.to_string(),
        "wo" => ordinal(locale_week(date).1),
        "ww" => zero_fill(locale_week(date).1 as i64, 2),
        "W" => dt.iso_week().week().to_string(),
        "Wo" => ordinal(dt.iso_week().week()),
        "WW" => zero_fill(dt.iso_week().week() as i64, 2),
        "gg" => zero_fill((locale_week(date).0 as i64).rem_euclid(100), 2),
        "gggg" => zero_fill(locale_week(date).0 as i64, 4),
        "GG" => zero_fill((dt.iso_week().year() as i64).rem_euclid(100), 2),
        "GGGG" => zero_fill(dt.iso_week().year() as i64, 4),

        "H" => dt.hour().to_string(),
        "HH" => zero_fill(dt.hour() as i64, 2),
        "h" => dt.hour12().1.to_string(),
        "hh" => zero_fill(dt.hour12().1 as i64, 2),
        "k" => hour_1_to_24(dt.hour()).to_string(),
        "kk" => zero_fill(hour_1_to_24(dt.hour()) as i64, 2),
        "m" => dt.minute().to_string(),
        "mm" => zero_fill(dt.minute() as i64, 2),
        "s" => dt.second().to_string(),
        "ss" => zero_fill(dt.second() as i64, 2),

        "A" => (if dt.hour() < 12 { "AM" } else { "PM" }).to_string(),
        "a" => (if dt.hour() < 12 { "am" } else { "pm" }).to_string(),

        "Z" => offset(dt, ":"),
        "ZZ" => offset(dt, ""),
        // only set for UTC-mode values, never for local time
        "z" | "zz" => String::new(),
        "X" => dt.timestamp().to_string(),
        "x" => dt.timestamp_millis().to_string(),

        "N" | "NN" | "NNN" | "NNNNN" => (if year > 0 { "AD" } else { "BC" }).to_string(),
        "NNNN" => (if year > 0 { "Anno Domini" } else { "Before Christ" }).to_string(),

        // S, SS, ... SSSSSSSSS: millisecond digits, zero-padded past three
        fraction if fraction.bytes().all(|b| b == b'S') => {
            let millis = format!("{:03}", (dt.nanosecond() / 1_000_000) % 1000);
            if fraction.len() <= 3 {
                millis[..fraction.len()].to_string()
            } else {
                format!("{}{}", millis, "0".repeat(fraction.len() - 3))
            }
        }

        other => other.to_string(),
    }
}

/// Pad the absolute value with zeros, keeping the sign in front.
fn zero_fill(n: i64, width: usize) -> String {
    let sign = if n < 0 { "-" } else { "" };
    format!("{}{:0width$}", sign, n.unsigned_abs(), width = width)
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 21st.
fn ordinal(n: u32) -> String {
    let suffix = if (n % 100) / 10 == 1 {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{}{}", n, suffix)
}

fn hour_1_to_24(hour: u32) -> u32 {
    if hour == 0 { 24 } else { hour }
}

fn offset(dt: &DateTime<FixedOffset>, separator: &str) -> String {
    let total = dt.offset().local_minus_utc();
    let sign = if total < 0 { '-' } else { '+' };
    let minutes = total.unsigned_abs() / 60;
    format!("{}{:02}{}{:02}", sign, minutes / 60, separator, minutes % 60)
}

/// Week-year and week number for the en locale: weeks start on Sunday and
/// week 1 is the week containing January 1st.
fn locale_week(date: NaiveDate) -> (i32, u32) {
    let start = date - Days::new(date.weekday().num_days_from_sunday() as u64);
    let end = start + Days::new(6);
    if end.year() > start.year() {
        return (end.year(), 1);
    }

    let jan1 = start.with_ordinal(1).unwrap_or(start);
    let first = jan1 - Days::new(jan1.weekday().num_days_from_sunday() as u64);
    let week = (start - first).num_days() / 7 + 1;
    (start.year(), week as u32)
}

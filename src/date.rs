//! Timestamp handling.
//!
//! Two textual forms are involved:
//!
//! - the strict UTC instant shown to users, `YYYY-MM-DDTHH:MM:SSZ`;
//! - the PDF date string stored in the `/Info` dictionary,
//!   `D:YYYYMMDDHHmmSSOHH'mm'` (every component after the year optional).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::ops::Range;

// `d` marks a position that must hold an ASCII digit; every other byte must
// match literally.
const INSTANT_PATTERN: &[u8; 20] = b"dddd-dd-ddTdd:dd:ddZ";

const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// ── Strict instant ────────────────────────────────────────────────────────────

/// Returns `true` when `value` is exactly a strict UTC instant such as
/// `2024-01-15T10:30:00Z`.
///
/// This is a character-pattern check only: `2024-13-45T99:99:99Z` passes.
/// The empty string does not match; callers that treat an empty date as
/// "not set" must check for it themselves.
///
/// ```
/// use pdfmetaedit::is_valid_instant;
///
/// assert!(is_valid_instant("2024-01-15T10:30:00Z"));
/// assert!(!is_valid_instant("2024-01-15 10:30:00Z"));
/// assert!(!is_valid_instant(""));
/// ```
pub fn is_valid_instant(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == INSTANT_PATTERN.len()
        && bytes
            .iter()
            .zip(INSTANT_PATTERN.iter())
            .all(|(&b, &p)| match p {
                b'd' => b.is_ascii_digit(),
                _ => b == p,
            })
}

/// Format a timestamp in the strict instant form (seconds precision).
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.format(INSTANT_FORMAT).to_string()
}

/// Parse a strict instant into a real calendar timestamp.
///
/// Returns `None` when the pattern does not match or when the digits do not
/// name an existing date and time (month 13, February 30th, hour 24).
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    if !is_valid_instant(value) {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(value, INSTANT_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

// ── Commit-time parsing ──────────────────────────────────────────────────────

/// Parse a user-entered date for writing into the document.
///
/// In strict mode only [`parse_instant`] is consulted. In lenient mode the
/// input is trimmed and, in order, tried as a strict instant, an RFC 3339
/// timestamp with any offset or fractional seconds, a date and time without
/// a zone (`T` or space separated, read as UTC), and a bare calendar date
/// (UTC midnight).
pub fn parse_commit_date(value: &str, lenient: bool) -> Option<DateTime<Utc>> {
    if !lenient {
        return parse_instant(value);
    }

    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    parse_instant(value)
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}

// ── PDF date strings ─────────────────────────────────────────────────────────

/// Parse a PDF date string (`D:YYYYMMDDHHmmSSOHH'mm'`).
///
/// The `D:` prefix is optional, as is every component after the year.
/// Missing components default to the start of the period, a missing zone
/// means UTC. Out-of-range components make the whole date invalid.
pub fn parse_pdf_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);

    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, zone) = s.split_at(digits_end);
    if digits.len() < 4 || digits.len() > 14 || digits.len() % 2 != 0 {
        return None;
    }

    let component = |range: Range<usize>, default: u32| -> Option<u32> {
        match digits.get(range) {
            Some(d) => d.parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = digits[0..4].parse().ok()?;
    let naive = NaiveDate::from_ymd_opt(year, component(4..6, 1)?, component(6..8, 1)?)?
        .and_hms_opt(
            component(8..10, 0)?,
            component(10..12, 0)?,
            component(12..14, 0)?,
        )?;

    let offset = parse_pdf_offset(zone)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format a timestamp as a PDF date string in UTC, e.g. `D:20240115103000Z`.
pub fn format_pdf_date(instant: &DateTime<Utc>) -> String {
    instant.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// `""`, `Z`, `+HH'mm'`, `-HH'mm`, `+HHmm` and `+HH` are all seen in the wild.
fn parse_pdf_offset(zone: &str) -> Option<FixedOffset> {
    let mut chars = zone.chars();
    let sign = match chars.next() {
        None | Some('Z') => return FixedOffset::east_opt(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };

    let digits: String = chars.filter(|c| *c != '\'').collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = match digits.get(2..4) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

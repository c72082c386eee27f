//! Lenient numeric and calendar parsing used by bound checks.

use chrono::NaiveDate;

/// Leading-integer parse: optional whitespace and sign, then digits up to
/// the first non-digit. `"12px"` is 12, `"px"` is `None`.
pub fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Characters `start..end`, clamped to the string.
pub fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

/// Drop date/time separators so `12:30` compares as `1230`.
pub fn strip_separators(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '-' | '/' | '.' | ':'))
        .collect()
}

/// A strict `yyyy-mm-dd` calendar date. Rolled-over dates like
/// `2023-02-30` are rejected.
pub fn calendar_date(text: &str) -> Option<NaiveDate> {
    let mut bits = text.split('-');
    let year = bits.next()?.trim().parse().ok()?;
    let month = bits.next()?.trim().parse().ok()?;
    let day = bits.next()?.trim().parse().ok()?;
    if bits.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("  -7abc"), Some(-7));
        assert_eq!(parse_int("12.9"), Some(12));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
    }

    #[test]
    fn test_char_slice_clamps() {
        assert_eq!(char_slice("12:30", 0, 2), "12");
        assert_eq!(char_slice("12:30", 3, 5), "30");
        assert_eq!(char_slice("1", 3, 5), "");
    }

    #[test]
    fn test_strip_separators() {
        assert_eq!(strip_separators("12:30"), "1230");
        assert_eq!(strip_separators("2024-01-02"), "20240102");
    }

    #[test]
    fn test_calendar_date() {
        assert!(calendar_date("2024-02-29").is_some());
        assert!(calendar_date("2023-02-29").is_none());
        assert!(calendar_date("2024-13-01").is_none());
        assert!(calendar_date("2024-01").is_none());
        assert!(calendar_date("2024-01-01-01").is_none());
        assert!(calendar_date("abcd-01-01").is_none());
    }
}

use chrono::NaiveDate;
use serde::Deserialize;

use crate::schema::MAX_YEARS_DIFF;
use crate::validation::{char_slice, parse_int};

/// One drop-down of a composite date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatePart {
    Day,
    Month,
    Year,
}

/// Left-to-right order of the drop-downs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateOrder {
    #[default]
    DayMonthYear,
    MonthDayYear,
    YearMonthDay,
}

impl DateOrder {
    /// Read a format string such as `dd/mm/yyyy` or `yyyy-mm-dd`.
    ///
    /// Separators and case are ignored; unrecognized formats fall back to
    /// year-month-day.
    pub fn from_format(format: &str) -> Self {
        let normalized: String = format
            .chars()
            .filter(|c| !matches!(c, '-' | '/' | '.'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "ddmmyyyy" => Self::DayMonthYear,
            "mmddyyyy" => Self::MonthDayYear,
            _ => Self::YearMonthDay,
        }
    }

    pub fn parts(self) -> [DatePart; 3] {
        match self {
            Self::DayMonthYear => [DatePart::Day, DatePart::Month, DatePart::Year],
            Self::MonthDayYear => [DatePart::Month, DatePart::Day, DatePart::Year],
            Self::YearMonthDay => [DatePart::Year, DatePart::Month, DatePart::Day],
        }
    }
}

/// Day/month/year drop-downs bound to a canonical `yyyy-mm-dd` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePicker {
    canonical: String,
    day: Option<u32>,
    month: Option<u32>,
    year: Option<i32>,
    order: DateOrder,
    first_year: i32,
    last_year: i32,
    /// Error styling on the drop-downs, mirrored from the field.
    pub errored: bool,
}

impl DatePicker {
    /// A picker offering `current_year ± years_diff`, with the current year
    /// preselected and day/month at their placeholders.
    ///
    /// The span is capped at [`MAX_YEARS_DIFF`] years either side.
    pub fn new(order: DateOrder, current_year: i32, years_diff: i32) -> Self {
        let years_diff = years_diff.unsigned_abs().min(MAX_YEARS_DIFF) as i32;
        Self {
            canonical: String::new(),
            day: None,
            month: None,
            year: Some(current_year),
            order,
            first_year: current_year.saturating_sub(years_diff),
            last_year: current_year.saturating_add(years_diff),
            errored: false,
        }
    }

    /// Apply a preset canonical value.
    pub fn with_canonical(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.set_canonical(value);
        }
        self
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn order(&self) -> DateOrder {
        self.order
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Offered years, newest first.
    pub fn year_options(&self) -> Vec<i32> {
        (self.first_year..=self.last_year).rev().collect()
    }

    /// Change one drop-down (`None` is the placeholder) and recompute the
    /// canonical value. Values outside the drop-down's domain are rejected.
    pub fn select(&mut self, part: DatePart, value: Option<i32>) -> bool {
        match (part, value) {
            (DatePart::Day, None) => self.day = None,
            (DatePart::Day, Some(d)) if (1..=31).contains(&d) => self.day = Some(d as u32),
            (DatePart::Month, None) => self.month = None,
            (DatePart::Month, Some(m)) if (1..=12).contains(&m) => self.month = Some(m as u32),
            (DatePart::Year, None) => self.year = None,
            (DatePart::Year, Some(y)) if (self.first_year..=self.last_year).contains(&y) => {
                self.year = Some(y)
            }
            _ => return false,
        }
        self.recompute();
        true
    }

    /// Set the canonical value directly, back-deriving the drop-downs when
    /// it is a self-consistent calendar date.
    pub fn set_canonical(&mut self, value: &str) {
        self.canonical = value.to_string();
        let year = parse_int(&char_slice(value, 0, 4));
        let month = parse_int(&char_slice(value, 5, 7));
        let day = parse_int(&char_slice(value, 8, 10));
        let (Some(year), Some(month), Some(day)) = (year, month, day) else {
            return;
        };
        let (Ok(year), Ok(month), Ok(day)) = (
            i32::try_from(year),
            u32::try_from(month),
            u32::try_from(day),
        ) else {
            return;
        };
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return;
        }
        self.day = Some(day);
        self.month = Some(month);
        self.year = (self.first_year..=self.last_year)
            .contains(&year)
            .then_some(year);
    }

    fn recompute(&mut self) {
        let (Some(year), Some(month), Some(day)) = (self.year, self.month, self.day) else {
            self.canonical.clear();
            return;
        };
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => self.canonical = date.format("%Y-%m-%d").to_string(),
            None => {
                // A complete but impossible date resets the month.
                self.month = None;
                self.canonical.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_from_format() {
        assert_eq!(DateOrder::from_format("dd/mm/yyyy"), DateOrder::DayMonthYear);
        assert_eq!(DateOrder::from_format("MM-DD-YYYY"), DateOrder::MonthDayYear);
        assert_eq!(DateOrder::from_format("yyyy.mm.dd"), DateOrder::YearMonthDay);
        assert_eq!(DateOrder::from_format("whatever"), DateOrder::YearMonthDay);
    }

    #[test]
    fn test_year_range() {
        let picker = DatePicker::new(DateOrder::default(), 2026, 2);
        assert_eq!(picker.year_options(), vec![2028, 2027, 2026, 2025, 2024]);
        assert_eq!(picker.year(), Some(2026));
    }

    #[test]
    fn test_year_range_is_capped() {
        for diff in [i32::MAX, i32::MIN] {
            let picker = DatePicker::new(DateOrder::default(), 2026, diff);
            let years = picker.year_options();
            assert_eq!(years.len(), 2 * MAX_YEARS_DIFF as usize + 1);
            assert_eq!(years.first(), Some(&3026));
            assert_eq!(years.last(), Some(&1026));
        }
    }
}

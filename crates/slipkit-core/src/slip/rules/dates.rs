//! Order date parsing.

use chrono::NaiveDate;

use super::patterns::{DATE_DAY_FIRST, DATE_ISO, DATE_MONTH_FIRST, DATE_US};
use super::{ExtractionMatch, FieldExtractor};

/// Date extractor for the formats Seller Central prints.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    fn scan(&self, idx: usize, line: &str, results: &mut Vec<ExtractionMatch<NaiveDate>>) {
        let mut push = |date: Option<NaiveDate>, source: &str| {
            if let Some(date) = date {
                if !results.iter().any(|r| r.value == date) {
                    results.push(ExtractionMatch::new(date, idx, source));
                }
            }
        };

        // "Sat, Oct 12, 2024" / "October 12, 2024"
        for caps in DATE_MONTH_FIRST.captures_iter(line) {
            let date = month_from_name(&caps[1]).and_then(|month| {
                NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[2].parse().ok()?)
            });
            push(date, &caps[0]);
        }

        // "12 Oct 2024"
        for caps in DATE_DAY_FIRST.captures_iter(line) {
            let date = month_from_name(&caps[2]).and_then(|month| {
                NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[1].parse().ok()?)
            });
            push(date, &caps[0]);
        }

        for caps in DATE_ISO.captures_iter(line) {
            let date = (|| {
                NaiveDate::from_ymd_opt(
                    caps[1].parse().ok()?,
                    caps[2].parse().ok()?,
                    caps[3].parse().ok()?,
                )
            })();
            push(date, &caps[0]);
        }

        // US marketplace prints month first
        for caps in DATE_US.captures_iter(line) {
            let date = (|| {
                NaiveDate::from_ymd_opt(
                    caps[3].parse().ok()?,
                    caps[1].parse().ok()?,
                    caps[2].parse().ok()?,
                )
            })();
            push(date, &caps[0]);
        }
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, lines: &[String]) -> Option<Self::Output> {
        self.extract_all(lines).into_iter().next()
    }

    fn extract_all(&self, lines: &[String]) -> Vec<Self::Output> {
        let mut results = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            self.scan(idx, line, &mut results);
        }
        results
    }
}

/// Parse the value captured after an "Order Date:" anchor.
pub fn parse_order_date(value: &str) -> Option<NaiveDate> {
    DateExtractor::new()
        .extract(&[value.to_string()])
        .map(|m| m.value)
}

/// Convert an English month name or abbreviation to its number.
fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    // Reject words that merely start like a month ("Mark", "Decor")
    let full = [
        "january", "february", "march", "april", "may", "june", "july", "august",
        "september", "october", "november", "december",
    ][month as usize - 1];
    if full.starts_with(&lower) || lower == "sept" {
        Some(month)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_order_date_formats() {
        assert_eq!(parse_order_date("Sat, Oct 12, 2024"), Some(ymd(2024, 10, 12)));
        assert_eq!(parse_order_date("Oct 12, 2024"), Some(ymd(2024, 10, 12)));
        assert_eq!(parse_order_date("October 12, 2024"), Some(ymd(2024, 10, 12)));
        assert_eq!(parse_order_date("Sept. 3, 2024"), Some(ymd(2024, 9, 3)));
        assert_eq!(parse_order_date("12 Oct 2024"), Some(ymd(2024, 10, 12)));
        assert_eq!(parse_order_date("2024-10-12"), Some(ymd(2024, 10, 12)));
        assert_eq!(parse_order_date("10/12/2024"), Some(ymd(2024, 10, 12)));
    }

    #[test]
    fn test_invalid_dates_rejected() {
        assert_eq!(parse_order_date("Oct 32, 2024"), None);
        assert_eq!(parse_order_date("Mark 12, 2024"), None);
        assert_eq!(parse_order_date("soon"), None);
    }

    #[test]
    fn test_extract_all_keeps_distinct_dates_in_order() {
        let lines = vec![
            "Order Date: Oct 12, 2024".to_string(),
            "Ship by: 2024-10-15".to_string(),
            "Printed 10/12/2024".to_string(),
        ];
        let found: Vec<_> = DateExtractor::new()
            .extract_all(&lines)
            .into_iter()
            .map(|m| (m.line, m.value))
            .collect();
        assert_eq!(found, vec![(0, ymd(2024, 10, 12)), (1, ymd(2024, 10, 15))]);
    }

    #[test]
    fn test_month_from_name() {
        assert_eq!(month_from_name("JANUARY"), Some(1));
        assert_eq!(month_from_name("dec"), Some(12));
        assert_eq!(month_from_name("de"), None);
    }
}

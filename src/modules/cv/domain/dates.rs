use chrono::NaiveDate;

pub const INVALID_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM, YYYY-MM-DD.";
pub const END_DATE_MUST_BE_EMPTY: &str = "End date must be empty for a current position.";
pub const END_BEFORE_START: &str = "End date cannot be earlier than start date.";

/// Accepts `YYYY-MM-DD`, or `YYYY-MM` meaning the first day of that month.
pub fn parse_cv_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .ok()
}

/// Resolves the end date to store for a dated section.
///
/// A current position never carries an end date; otherwise the end date may
/// not precede the start date.
pub fn resolve_end_date(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    is_current: bool,
) -> Result<Option<NaiveDate>, &'static str> {
    match (is_current, start_date, end_date) {
        (true, _, Some(_)) => Err(END_DATE_MUST_BE_EMPTY),
        (true, _, None) => Ok(None),
        (false, Some(start), Some(end)) if end < start => Err(END_BEFORE_START),
        (false, _, end) => Ok(end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_precision_means_first_of_month() {
        assert_eq!(parse_cv_date("2021-03"), Some(date(2021, 3, 1)));
        assert_eq!(parse_cv_date("2021-03-17"), Some(date(2021, 3, 17)));
        assert_eq!(parse_cv_date(" 2021-03 "), Some(date(2021, 3, 1)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_cv_date("2021"), None);
        assert_eq!(parse_cv_date("2021-13"), None);
        assert_eq!(parse_cv_date("March 2021"), None);
        assert_eq!(parse_cv_date(""), None);
    }

    #[test]
    fn current_position_drops_end_date() {
        assert_eq!(resolve_end_date(Some(date(2020, 1, 1)), None, true), Ok(None));
    }

    #[test]
    fn current_position_with_end_date_is_rejected() {
        assert_eq!(
            resolve_end_date(Some(date(2020, 1, 1)), Some(date(2021, 1, 1)), true),
            Err(END_DATE_MUST_BE_EMPTY)
        );
    }

    #[test]
    fn end_before_start_is_rejected() {
        assert_eq!(
            resolve_end_date(Some(date(2020, 6, 1)), Some(date(2020, 5, 1)), false),
            Err(END_BEFORE_START)
        );
        assert_eq!(
            resolve_end_date(Some(date(2020, 6, 1)), Some(date(2020, 6, 1)), false),
            Ok(Some(date(2020, 6, 1)))
        );
    }
}

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Local wall-clock time, as stored in DATETIME columns
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Trim a free-text field; blank becomes `None`
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_matches_now() {
        assert_eq!(now().date(), today());
    }

    #[test]
    fn blank_text_is_dropped() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" Centro ".into())), Some("Centro".into()));
        assert_eq!(non_blank(None), None);
    }
}

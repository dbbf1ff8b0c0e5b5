use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};

#[derive(Clone)]
pub struct NumberFormatOptions {
    pub use_comma: bool,
    pub use_human: bool,
    pub locale: String,
    pub decimal_places: usize,
}

/// Format a counter for display. Accepts both u32 and u64.
pub fn format_number(n: impl Into<u64>, options: &NumberFormatOptions) -> String {
    let n: u64 = n.into();
    let locale = match options.locale.as_str() {
        "de" => Locale::de,
        "fr" => Locale::fr,
        "es" => Locale::es,
        "it" => Locale::it,
        "ja" => Locale::ja,
        "ko" => Locale::ko,
        "zh" => Locale::zh,
        _ => Locale::en,
    };

    if options.use_human {
        if n >= 1_000_000_000_000 {
            format!(
                "{:.prec$}t",
                n as f64 / 1_000_000_000_000.0,
                prec = options.decimal_places
            )
        } else if n >= 1_000_000_000 {
            format!(
                "{:.prec$}b",
                n as f64 / 1_000_000_000.0,
                prec = options.decimal_places
            )
        } else if n >= 1_000_000 {
            format!(
                "{:.prec$}m",
                n as f64 / 1_000_000.0,
                prec = options.decimal_places
            )
        } else if n >= 1_000 {
            format!(
                "{:.prec$}k",
                n as f64 / 1_000.0,
                prec = options.decimal_places
            )
        } else {
            n.to_string()
        }
    } else if options.use_comma {
        n.to_formatted_string(&locale)
    } else {
        n.to_string()
    }
}

/// Non-padded M/D/YYYY, with a trailing `*` marking today.
pub fn format_date_for_display(date: NaiveDate) -> String {
    let formatted = format!("{}/{}/{}", date.month(), date.day(), date.year());
    if date == chrono::Local::now().date_naive() {
        format!("{formatted}*")
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(use_comma: bool, use_human: bool) -> NumberFormatOptions {
        NumberFormatOptions {
            use_comma,
            use_human,
            locale: "en".to_string(),
            decimal_places: 1,
        }
    }

    #[test]
    fn plain_comma_and_human_formats() {
        assert_eq!(format_number(1234u64, &options(false, false)), "1234");
        assert_eq!(format_number(1234u64, &options(true, false)), "1,234");
        assert_eq!(format_number(1234u64, &options(false, true)), "1.2k");
        assert_eq!(format_number(2_500_000u64, &options(false, true)), "2.5m");
        assert_eq!(format_number(999u64, &options(false, true)), "999");
    }

    #[test]
    fn locale_aware_grouping() {
        let mut opts = options(true, false);
        opts.locale = "de".to_string();
        assert_eq!(format_number(1_234_567u64, &opts), "1.234.567");
    }

    #[test]
    fn display_dates_are_not_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date_for_display(date), "1/5/2024");
    }
}

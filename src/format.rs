//! Display formatting for transaction dates.

use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

/// Month names in the genitive case, as used in a Russian long date.
const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

const CREATED_AT_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const CREATED_AT_ISO_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

fn parse_created_at(created_at: &str) -> Option<PrimitiveDateTime> {
    let created_at = created_at.trim();

    PrimitiveDateTime::parse(created_at, CREATED_AT_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(created_at, CREATED_AT_ISO_FORMAT))
        .ok()
}

/// The Russian long date with short time, e.g. "10 марта 2019 г., 03:20".
fn long_date_short_time(date_time: PrimitiveDateTime) -> String {
    let month = MONTHS_GENITIVE[usize::from(u8::from(date_time.month())) - 1];

    format!(
        "{} {} {} г., {:02}:{:02}",
        date_time.day(),
        month,
        date_time.year(),
        date_time.hour(),
        date_time.minute()
    )
}

/// Format a backend timestamp such as "2019-03-10 03:20:41" as
/// "10 марта 2019 г. в 03:20".
///
/// The timestamp is shown as the wall-clock time it names. A timestamp that
/// cannot be parsed is shown as is.
pub fn format_date(created_at: &str) -> String {
    match parse_created_at(created_at) {
        Some(date_time) => long_date_short_time(date_time).replacen(',', " в", 1),
        None => {
            tracing::debug!("could not parse transaction date {created_at:?}");
            created_at.to_owned()
        }
    }
}

#[cfg(test)]
mod format_date_tests {
    use super::format_date;

    #[test]
    fn formats_russian_long_date_with_time() {
        assert_eq!(format_date("2019-03-10 03:20:41"), "10 марта 2019 г. в 03:20");
    }

    #[test]
    fn day_is_not_padded_and_hour_is() {
        assert_eq!(format_date("2021-12-01 09:05:00"), "1 декабря 2021 г. в 09:05");
    }

    #[test]
    fn accepts_iso_separator() {
        assert_eq!(format_date("2020-05-31T23:59:59"), "31 мая 2020 г. в 23:59");
    }

    #[test]
    fn unparseable_date_is_shown_as_is() {
        assert_eq!(format_date("yesterday"), "yesterday");
    }
}

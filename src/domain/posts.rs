use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

/// `07 March, 2024`
pub const PUBLICATION_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day] [month repr:long], [year]");

pub fn format_publication_date(date: Date) -> String {
    date.format(PUBLICATION_DATE_FORMAT).expect("valid calendar date")
}

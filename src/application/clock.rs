use chrono_tz::Tz;
use time::{Date, OffsetDateTime};

use crate::util::timezone::localized_date;

/// Calendar source for creation dates and the footer year, evaluated in the site timezone.
#[derive(Debug, Clone, Copy)]
pub struct SiteClock {
    timezone: Tz,
    #[cfg(test)]
    fixed: Option<Date>,
}

impl SiteClock {
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            #[cfg(test)]
            fixed: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn fixed(date: Date) -> Self {
        Self {
            timezone: Tz::UTC,
            fixed: Some(date),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn today(&self) -> Date {
        #[cfg(test)]
        if let Some(date) = self.fixed {
            return date;
        }

        localized_date(OffsetDateTime::now_utc(), self.timezone)
    }

    pub fn current_year(&self) -> i32 {
        self.today().year()
    }
}

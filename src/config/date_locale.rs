use crate::error::{
    BadDateTimeFormatterSnafu, InvalidLocaleSnafu, InvalidTimezoneSnafu, RegistrarError,
    RegistrarResult, ZoneDateSnafu,
};
use dotenvy::var;
use icu::{
    calendar::preferences::CalendarAlgorithm,
    datetime::{
        DateTimeFormatter, DateTimeFormatterPreferences,
        fieldsets::{YMD, YMDET},
        options::{Alignment, TimePrecision},
        preferences::HourCycle,
    },
    locale::Locale,
    calendar::Iso,
    time::{TimeZoneInfo, ZonedDateTime, zone::models::AtTime},
};
use jiff::{Timestamp, Zoned, civil::Date, tz::TimeZone};
use jiff_icu::ConvertFrom;
use snafu::ResultExt;

/// How dates are shown on the dashboard.
#[derive(Debug, Clone)]
pub struct DateLocaleConfig {
    timezone: TimeZone,
    dtf_prefs: DateTimeFormatterPreferences,
}

#[derive(Copy, Clone, Debug)]
pub enum DateFormat {
    LongYMDET,
    ShortYMD,
}

impl DateLocaleConfig {
    fn dtf_prefs_from_strings(
        locale: String,
        hour_cycle: String,
        calendar_algorithm: String,
    ) -> RegistrarResult<DateTimeFormatterPreferences> {
        let locale =
            Locale::try_from_str(&locale).context(InvalidLocaleSnafu { provided: locale })?;
        let hour_cycle = match hour_cycle.as_str() {
            "h23" => HourCycle::H23,
            "h11" => HourCycle::H11,
            "h12" => HourCycle::H12,
            _ => {
                return Err(RegistrarError::InvalidHourCycle {
                    provided: hour_cycle,
                });
            }
        };
        let calendar_algorithm = match calendar_algorithm.as_str() {
            "gregorian" => CalendarAlgorithm::Iso8601,
            "buddhist" => CalendarAlgorithm::Buddhist,
            "japanese" => CalendarAlgorithm::Japanese,
            "hebrew" => CalendarAlgorithm::Hebrew,
            _ => {
                return Err(RegistrarError::InvalidCalendarAlgorithm {
                    provided: calendar_algorithm,
                });
            }
        };

        let mut prefs = DateTimeFormatterPreferences::default();
        prefs.locale_preferences = (&locale).into();
        prefs.hour_cycle = Some(hour_cycle);
        prefs.calendar_algorithm = Some(calendar_algorithm);
        Ok(prefs)
    }

    pub fn new(
        timezone: String,
        locale: String,
        hour_cycle: String,
        calendar_algorithm: String,
    ) -> RegistrarResult<Self> {
        let timezone = TimeZone::get(&timezone).context(InvalidTimezoneSnafu { tz: timezone })?;

        let dtf_prefs =
            Self::dtf_prefs_from_strings(locale, hour_cycle, calendar_algorithm)?;

        Ok(Self {
            timezone,
            dtf_prefs,
        })
    }

    pub fn from_env() -> RegistrarResult<Self> {
        let get_or = |name: &str, default: &str| var(name).unwrap_or_else(|_| default.to_string());

        Self::new(
            get_or("REGISTRAR_TIMEZONE", "UTC"),
            get_or("REGISTRAR_LOCALE", "en-GB"),
            get_or("REGISTRAR_HOUR_CYCLE", "h23"),
            get_or("REGISTRAR_CALENDAR", "gregorian"),
        )
    }

    pub fn format(&self, zoned: &Zoned, date_format: DateFormat) -> RegistrarResult<String> {
        let zdt: ZonedDateTime<Iso, TimeZoneInfo<AtTime>> = ZonedDateTime::convert_from(zoned);

        Ok(match date_format {
            DateFormat::LongYMDET => DateTimeFormatter::try_new(self.dtf_prefs, {
                let mut fieldset = YMDET::long();
                fieldset.alignment = Some(Alignment::Column);
                fieldset.time_precision = Some(TimePrecision::Minute);
                fieldset
            })
            .context(BadDateTimeFormatterSnafu)?
            .format(&zdt)
            .to_string(),
            DateFormat::ShortYMD => DateTimeFormatter::try_new(self.dtf_prefs, {
                let mut fieldset = YMD::short();
                fieldset.alignment = Some(Alignment::Column);
                fieldset
            })
            .context(BadDateTimeFormatterSnafu)?
            .format(&zdt)
            .to_string(),
        })
    }

    ///an instant, shown in the configured timezone
    pub fn long_timestamp(&self, timestamp: Timestamp) -> RegistrarResult<String> {
        self.format(
            &timestamp.to_zoned(self.timezone.clone()),
            DateFormat::LongYMDET,
        )
    }

    ///a calendar date, which has no timezone to shift into
    pub fn short_date(&self, date: Date) -> RegistrarResult<String> {
        let zoned = date
            .to_zoned(self.timezone.clone())
            .context(ZoneDateSnafu { date })?;
        self.format(&zoned, DateFormat::ShortYMD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn config(tz: &str) -> DateLocaleConfig {
        DateLocaleConfig::new(
            tz.to_string(),
            "en-GB".to_string(),
            "h23".to_string(),
            "gregorian".to_string(),
        )
        .expect("valid config")
    }

    #[test]
    fn dates_keep_their_calendar_day() {
        let formatted = config("UTC")
            .short_date(date(2006, 1, 15))
            .expect("formats");

        assert!(formatted.contains("15"), "{formatted}");
        assert!(formatted.contains("2006"), "{formatted}");
    }

    #[test]
    fn timestamps_use_a_24_hour_clock() {
        let ts: Timestamp = "2026-10-18T23:30:00Z".parse().expect("valid timestamp");
        let formatted = config("UTC").long_timestamp(ts).expect("formats");

        assert!(formatted.contains("2026"), "{formatted}");
        assert!(formatted.contains("23:30"), "{formatted}");
    }

    #[test]
    fn bad_settings_are_rejected() {
        assert!(matches!(
            DateLocaleConfig::new(
                "Not/AZone".to_string(),
                "en-GB".to_string(),
                "h23".to_string(),
                "gregorian".to_string()
            ),
            Err(RegistrarError::InvalidTimezone { .. })
        ));
        assert!(matches!(
            DateLocaleConfig::new(
                "UTC".to_string(),
                "en-GB".to_string(),
                "h25".to_string(),
                "gregorian".to_string()
            ),
            Err(RegistrarError::InvalidHourCycle { .. })
        ));
    }
}

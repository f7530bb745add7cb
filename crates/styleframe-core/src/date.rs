//! Excel serial date conversion (1900 date system)
//!
//! Serials count days from 1899-12-30, which matches spreadsheet display for
//! every date after 1900-02-28.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const SECONDS_PER_DAY: f64 = 86_400.0;

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default()
}

/// Serial number of a date
pub fn date_to_serial(date: NaiveDate) -> f64 {
    (date - epoch()).num_days() as f64
}

/// Fraction of a day for a time
pub fn time_to_serial(time: NaiveTime) -> f64 {
    let seconds = time.num_seconds_from_midnight() as f64 + time.nanosecond() as f64 / 1e9;
    seconds / SECONDS_PER_DAY
}

/// Serial number of a date and time
pub fn datetime_to_serial(datetime: NaiveDateTime) -> f64 {
    date_to_serial(datetime.date()) + time_to_serial(datetime.time())
}

/// Date and time for a serial number, rounded to the millisecond
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let millis = (serial * SECONDS_PER_DAY * 1000.0).round() as i64;
    epoch()
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::milliseconds(millis))
}

/// Date part of a serial number
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    serial_to_datetime(serial).map(|dt| dt.date())
}

/// Time part of a serial number (the integral days are dropped)
pub fn serial_to_time(serial: f64) -> Option<NaiveTime> {
    serial_to_datetime(serial.fract().abs()).map(|dt| dt.time())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_serials() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(date_to_serial(date), 36526.0);
        assert_eq!(serial_to_date(36526.0), Some(date));
    }

    #[test]
    fn test_time_fraction() {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(time_to_serial(noon), 0.5);
        assert_eq!(serial_to_time(36526.25), NaiveTime::from_hms_opt(6, 0, 0));
    }

    #[test]
    fn test_datetime_round_trip() {
        let dt = NaiveDate::from_ymd_opt(2021, 3, 14)
            .unwrap()
            .and_hms_opt(15, 9, 26)
            .unwrap();
        assert_eq!(serial_to_datetime(datetime_to_serial(dt)), Some(dt));
        assert_eq!(serial_to_datetime(-1.0), None);
    }
}

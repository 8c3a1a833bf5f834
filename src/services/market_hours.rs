use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;

/// Trading session configuration for Borsa Istanbul
pub struct TradingHours {
    pub start_hour: u32,
    pub end_hour: u32,
    pub timezone: Tz,
    pub weekdays_only: bool,
}

impl Default for TradingHours {
    fn default() -> Self {
        Self {
            start_hour: 10, // 10:00
            end_hour: 18,   // 18:00
            timezone: chrono_tz::Europe::Istanbul,
            weekdays_only: true,
        }
    }
}

impl TradingHours {
    /// Check whether `at` falls inside the session
    pub fn is_open_at<T: TimeZone>(&self, at: &DateTime<T>) -> bool {
        let local = at.with_timezone(&self.timezone);

        if self.weekdays_only && matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }

        let hour = local.hour();
        hour >= self.start_hour && hour < self.end_hour
    }
}

/// Check if the market is currently in session
pub fn is_trading_hours() -> bool {
    TradingHours::default().is_open_at(&Utc::now())
}

/// Get appropriate cache control max-age for price data
///
/// During the session: 30 seconds
/// Outside the session: 5 minutes
pub fn get_cache_max_age() -> u32 {
    if is_trading_hours() {
        30
    } else {
        300
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_trading_hours_config() {
        let config = TradingHours::default();
        assert_eq!(config.start_hour, 10);
        assert_eq!(config.end_hour, 18);
        assert!(config.weekdays_only);
    }

    #[test]
    fn test_session_in_istanbul_time() {
        let hours = TradingHours::default();
        // Istanbul is UTC+3 all year; 2024-03-13 is a Wednesday
        assert!(!hours.is_open_at(&utc(2024, 3, 13, 6, 59)));
        assert!(hours.is_open_at(&utc(2024, 3, 13, 7, 0)));
        assert!(hours.is_open_at(&utc(2024, 3, 13, 14, 59)));
        assert!(!hours.is_open_at(&utc(2024, 3, 13, 15, 0)));
    }

    #[test]
    fn test_weekend_closed() {
        let hours = TradingHours::default();
        // 2024-03-16 is a Saturday
        assert!(!hours.is_open_at(&utc(2024, 3, 16, 10, 0)));
    }

    #[test]
    fn test_cache_max_age_values() {
        assert!(matches!(get_cache_max_age(), 30 | 300));
    }
}

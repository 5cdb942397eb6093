use chrono::{Days, NaiveDate, NaiveTime};
use rust_decimal::Decimal;

/// A ticker resolved against one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSymbol {
    /// Symbol as it appears in the snapshot table (e.g. "SHIB", "MIOTA").
    pub symbol: String,
    /// Base ticker as the exchange lists it (e.g. "1000SHIB", "IOTA").
    pub ticker: String,
    /// Always positive.
    pub rank: i32,
}

/// One 8-hour funding settlement as reported by the exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct FundingObservation {
    /// Exchange pair, e.g. "BTCUSDT".
    pub pair: String,
    pub funding_time: i64,
    pub funding_rate: Decimal,
    /// Older settlements were published without a mark price.
    pub mark_price: Option<Decimal>,
}

/// A funding observation tied back to the snapshot row it was collected for.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedRow {
    pub funding_time: i64,
    pub symbol: String,
    pub funding_rate: Decimal,
    pub mark_price: Option<Decimal>,
    pub snapshot_date: NaiveDate,
    pub rank: i32,
}

/// Open time and opening mark price of one 8h mark-price kline.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkPriceSample {
    pub open_time: i64,
    pub open_price: Decimal,
}

/// The week following a snapshot: `[start_ms, end_ms)` in UTC milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl WeekWindow {
    pub const FUNDING_INTERVAL_MS: i64 = 8 * 60 * 60 * 1000;

    pub fn starting(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        let end = start + Days::new(7);
        Self {
            start_ms: start.timestamp_millis(),
            end_ms: end.timestamp_millis(),
        }
    }

    /// Last millisecond inside the window; the exchange treats `endTime`
    /// as inclusive.
    pub fn last_ms(&self) -> i64 {
        self.end_ms - 1
    }

    pub fn contains(&self, ts_ms: i64) -> bool {
        ts_ms >= self.start_ms && ts_ms < self.end_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_covers_seven_days() {
        let window = WeekWindow::starting(NaiveDate::from_ymd_opt(2019, 10, 1).unwrap());

        // 2019-10-01T00:00:00Z and 2019-10-08T00:00:00Z
        assert_eq!(window.start_ms, 1_569_888_000_000);
        assert_eq!(window.end_ms, 1_570_492_800_000);
        assert_eq!(window.last_ms(), 1_570_492_799_999);
        assert_eq!(window.end_ms - window.start_ms, 21 * WeekWindow::FUNDING_INTERVAL_MS);
    }

    #[test]
    fn window_is_half_open() {
        let window = WeekWindow::starting(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert!(window.contains(window.start_ms));
        assert!(window.contains(window.last_ms()));
        assert!(!window.contains(window.end_ms));
    }
}

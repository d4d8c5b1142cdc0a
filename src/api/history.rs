use crate::model::{DaySnapshot, History, HistoryRecord, MetaEntry};
use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use serde::de::DeserializeOwned;

/// Daily snapshot archive of store download counts.
const HISTORY_BASE_URL: &str = "https://github.com/tonka3000/rc-history/blob/master/data";

pub struct HistoryClient {
    client: reqwest::Client,
}

impl HistoryClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_day(&self, date: NaiveDate) -> DaySnapshot {
        let url = format!("{}/{}?raw=true", HISTORY_BASE_URL, history_path(date));
        match self.fetch_json::<Vec<HistoryRecord>>(&url).await {
            Ok(records) => DaySnapshot::new(records),
            Err(e) => {
                // Missing days are expected near the start of the archive.
                tracing::debug!("no history snapshot for {}: {}", date, e);
                DaySnapshot::empty()
            }
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, super::ApiError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(super::ApiError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}

impl Default for HistoryClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot dates backing the growth windows: yesterday, two days ago
/// and seven days ago. The archive never holds data for the current day.
pub fn history_dates(today: NaiveDate) -> [NaiveDate; 3] {
    [
        today - Days::new(1),
        today - Days::new(2),
        today - Days::new(7),
    ]
}

/// Archive path for one day, zero-padded (`2024/03/07.json`).
pub fn history_path(date: NaiveDate) -> String {
    date.format("%Y/%m/%d.json").to_string()
}

#[async_trait]
impl super::HistorySource for HistoryClient {
    async fn fetch_history(&self) -> History {
        let [day1, day2, day7] = history_dates(Local::now().date_naive());

        let (day1, day2, day7) = futures::join!(
            self.fetch_day(day1),
            self.fetch_day(day2),
            self.fetch_day(day7)
        );

        History { day1, day2, day7 }
    }

    async fn fetch_meta_info(&self) -> Option<Vec<MetaEntry>> {
        let url = format!("{}/extensions.json?raw=true", HISTORY_BASE_URL);
        match self.fetch_json::<Vec<MetaEntry>>(&url).await {
            Ok(entries) => Some(entries),
            Err(e) => {
                tracing::debug!("no meta info: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_history_path_zero_padded() {
        assert_eq!(history_path(date(2024, 3, 7)), "2024/03/07.json");
        assert_eq!(history_path(date(2023, 12, 25)), "2023/12/25.json");
    }

    #[test]
    fn test_history_dates_simple() {
        let dates = history_dates(date(2024, 6, 20));
        assert_eq!(
            dates,
            [date(2024, 6, 19), date(2024, 6, 18), date(2024, 6, 13)]
        );
    }

    #[test]
    fn test_history_dates_cross_month_boundary() {
        // 2024 is a leap year, so March 1st reaches back to February 29th.
        let dates = history_dates(date(2024, 3, 1));
        assert_eq!(
            dates,
            [date(2024, 2, 29), date(2024, 2, 28), date(2024, 2, 23)]
        );
    }

    #[test]
    fn test_history_dates_cross_year_boundary() {
        let dates = history_dates(date(2025, 1, 2));
        assert_eq!(
            dates,
            [date(2025, 1, 1), date(2024, 12, 31), date(2024, 12, 26)]
        );
    }
}

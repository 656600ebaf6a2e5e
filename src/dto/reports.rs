use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

/// Inclusive calendar range; both ends default to today
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    /// `YYYY-MM-DD`
    pub start_date: Option<NaiveDate>,
    /// `YYYY-MM-DD`
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopItemsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Number of rows, 1 to 500
    pub limit: Option<u64>,
}

impl TopItemsQuery {
    pub fn range(&self) -> DateRangeQuery {
        DateRangeQuery {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Midnight UTC opening `date`
pub fn start_of_day(date: NaiveDate) -> chrono::DateTime<chrono::Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

use serde::Deserialize;

use crate::engine::calendar::YearMonth;

/// `?month=YYYY-MM` on schedule and work-card reads.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: YearMonth,
}

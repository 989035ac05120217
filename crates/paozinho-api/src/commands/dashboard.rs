//! # Dashboard Command

use chrono::NaiveDate;
use paozinho_core::report::SalesReport;
use paozinho_core::ValidationError;
use tracing::debug;

use crate::error::ConsoleResult;
use crate::Console;

/// Report over every sale whose date falls in `period` (inclusive).
pub async fn dashboard(console: &Console, period: Option<(NaiveDate, NaiveDate)>) -> ConsoleResult<SalesReport> {
    debug!(?period, "dashboard command");

    if let Some((from, to)) = period {
        if from > to {
            return Err(ValidationError::InvalidFormat {
                field: "period".to_string(),
                reason: "start date is after end date".to_string(),
            }
            .into());
        }
    }

    let sales = console.api().sales().list().await?;
    Ok(SalesReport::build(&sales, period))
}

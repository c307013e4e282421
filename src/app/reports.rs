use tracing::{error, info};

use crate::charts::render_chart;
use crate::config::Settings;
use crate::error::{AppError, AppResult, ReportError};
use crate::report::{ExchangeSeries, write_summary_report};
use crate::stats::compute_statistics_at;
use crate::store::SeriesStore;

/// Renders one chart per exchange plus the summary report.
///
/// Every exchange is attempted even when an earlier one fails.
///
/// # Errors
///
/// Returns `ReportsFailed` when any chart or the summary could not be
/// produced.
pub(crate) fn generate_reports(settings: &Settings) -> AppResult<()> {
    let store = SeriesStore::new(&settings.data_dir, settings.max_entries);
    let report = &settings.report;

    let mut entries = Vec::with_capacity(settings.registry.len());
    let mut failed = 0usize;
    let mut total = 0usize;

    for profile in settings.registry.exchanges() {
        total = total.saturating_add(1);
        let label = profile.label();
        let series = store.load(&profile.key);

        let chart = if series.is_empty() {
            Err(ReportError::EmptySeries {
                exchange: profile.key.clone(),
            })
        } else {
            compute_statistics_at(&series, report.percentile).and_then(|stats| {
                info!(
                    "{}: {} samples, mean {:.2} ms, p{} {:.2} ms",
                    label, stats.count, stats.mean, stats.tail.percentile, stats.tail.value_ms
                );
                render_chart(&profile.key, &series, &stats, &report.chart)
            })
        };
        match chart {
            Ok(path) => println!("✓ {} chart: {}", label, path.display()),
            Err(err) => {
                failed = failed.saturating_add(1);
                error!("{} chart failed: {}", label, err);
                println!("✗ {} chart: {}", label, err);
            }
        }

        entries.push(ExchangeSeries {
            key: profile.key.clone(),
            label,
            series,
        });
    }

    total = total.saturating_add(1);
    match write_summary_report(&entries, report) {
        Ok(path) => println!("✓ Summary report: {}", path.display()),
        Err(err) => {
            failed = failed.saturating_add(1);
            error!("Summary report failed: {}", err);
            println!("✗ Summary report: {}", err);
        }
    }

    if failed > 0 {
        return Err(AppError::ReportsFailed { failed, total });
    }
    Ok(())
}

use filmarket_core::pricing::format_average;
use filmarket_core::{CycleReport, Region, ReportSink, Result};
use tracing::info;

/// Prints each report as one JSON line on stdout and logs a summary.
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&self, report: &CycleReport) -> Result<()> {
        let json = serde_json::to_string(report)?;
        println!("{}", json);

        let (Some(fil_price), Some(averages)) = (&report.fil_price, &report.averages) else {
            info!("Cycle aborted, nothing to report");
            return Ok(());
        };

        info!("FIL price: {} USD", fil_price);
        info!(
            "Global: {} USD/TiB/month over {} miners",
            format_average(averages.global.price),
            averages.global.count
        );
        for region in Region::ALL {
            let bucket = averages.region(region);
            info!(
                "{}: {} USD/TiB/month over {} miners",
                region,
                format_average(bucket.price),
                bucket.count
            );
        }
        Ok(())
    }
}

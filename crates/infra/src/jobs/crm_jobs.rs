//! The four CRM jobs.

use chrono::{Duration, Utc};

use super::backend::CrmBackend;
use super::types::{JobError, JobRecord, ScheduledJob};

/// Trailing window scanned by the order reminders job.
pub const REMINDER_WINDOW_DAYS: i64 = 7;

/// Liveness record, optionally with an API probe qualifier.
///
/// Probe failures only change the qualifier; the run itself always succeeds.
#[derive(Debug, Clone, Copy)]
pub struct Heartbeat {
    pub probe: bool,
}

impl Heartbeat {
    pub const NAME: &'static str = "heartbeat";
    pub const LOG_FILE: &'static str = "crm_heartbeat_log.txt";

    pub fn new(probe: bool) -> Self {
        Self { probe }
    }
}

impl ScheduledJob for Heartbeat {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn log_file(&self) -> &'static str {
        Self::LOG_FILE
    }

    fn run(&self, backend: &dyn CrmBackend) -> Result<JobRecord, JobError> {
        if !self.probe {
            return Ok(JobRecord::line("CRM is alive"));
        }
        let qualifier = match backend.ping() {
            Ok(()) => "API OK",
            Err(e) if e.is_unreachable() => "API unreachable",
            Err(_) => "API check failed",
        };
        Ok(JobRecord::line(format!("CRM is alive ({qualifier})")))
    }
}

/// Restocks every low-stock product.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestockLowStock;

impl RestockLowStock {
    pub const NAME: &'static str = "restock_low_stock";
    pub const LOG_FILE: &'static str = "low_stock_updates_log.txt";
}

impl ScheduledJob for RestockLowStock {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn log_file(&self) -> &'static str {
        Self::LOG_FILE
    }

    fn run(&self, backend: &dyn CrmBackend) -> Result<JobRecord, JobError> {
        let result = backend.restock_low_stock()?;
        let details = result
            .updated_products
            .iter()
            .map(|p| format!("{} (Stock: {})", p.name, p.stock))
            .collect();
        Ok(JobRecord::line(result.summary).with_details(details))
    }
}

/// Logs a reminder for each pending order of the trailing week.
#[derive(Debug, Clone, Copy)]
pub struct OrderReminders {
    pub window: Duration,
}

impl Default for OrderReminders {
    fn default() -> Self {
        Self {
            window: Duration::days(REMINDER_WINDOW_DAYS),
        }
    }
}

impl OrderReminders {
    pub const NAME: &'static str = "order_reminders";
    pub const LOG_FILE: &'static str = "order_reminders_log.txt";
}

impl ScheduledJob for OrderReminders {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn log_file(&self) -> &'static str {
        Self::LOG_FILE
    }

    fn run(&self, backend: &dyn CrmBackend) -> Result<JobRecord, JobError> {
        let end = Utc::now();
        let reminders = backend.pending_reminders(end - self.window, end)?;

        if reminders.is_empty() {
            return Ok(JobRecord::line(format!(
                "No pending orders found in the last {} days.",
                self.window.num_days()
            )));
        }

        let details = reminders
            .iter()
            .map(|r| {
                format!(
                    "Reminder sent for Order ID: {}, Customer Email: {}",
                    r.order_id, r.customer_email
                )
            })
            .collect();
        Ok(JobRecord::line(format!("{} pending order reminder(s)", reminders.len())).with_details(details))
    }

    fn failure_record(&self, error: &JobError) -> JobRecord {
        JobRecord::line(format!("Error while sending order reminders: {error}"))
    }
}

/// One-line customer/order/revenue report.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateReport;

impl GenerateReport {
    pub const NAME: &'static str = "generate_report";
    pub const LOG_FILE: &'static str = "crm_report_log.txt";
}

impl ScheduledJob for GenerateReport {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn log_file(&self) -> &'static str {
        Self::LOG_FILE
    }

    fn run(&self, backend: &dyn CrmBackend) -> Result<JobRecord, JobError> {
        let s = backend.summary()?;
        Ok(JobRecord::line(format!(
            "Report: {} customers, {} orders, {} revenue",
            s.total_customers, s.total_orders, s.total_revenue
        )))
    }

    fn failure_record(&self, error: &JobError) -> JobRecord {
        JobRecord::line(format!("Error generating report: {error}"))
    }
}

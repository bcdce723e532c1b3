//! Where jobs send their calls.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;

use crate::services::{CrmServices, CrmSummary, OrderReminder, RestockSummary};
use crate::store::EntityStore;

use super::types::JobError;

/// Calls the jobs make into the CRM service.
pub trait CrmBackend: Send + Sync {
    /// Cheap liveness probe.
    fn ping(&self) -> Result<(), JobError>;

    fn restock_low_stock(&self) -> Result<RestockSummary, JobError>;

    fn pending_reminders(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<OrderReminder>, JobError>;

    fn summary(&self) -> Result<CrmSummary, JobError>;
}

/// Backend calling the services directly, for jobs co-located with the store.
#[derive(Debug, Clone)]
pub struct InProcessBackend<S> {
    services: CrmServices<S>,
}

impl<S> InProcessBackend<S> {
    pub fn new(services: CrmServices<S>) -> Self {
        Self { services }
    }
}

impl<S: EntityStore> CrmBackend for InProcessBackend<S> {
    fn ping(&self) -> Result<(), JobError> {
        self.services.reporting.total_customers()?;
        Ok(())
    }

    fn restock_low_stock(&self) -> Result<RestockSummary, JobError> {
        Ok(self.services.mutations.update_low_stock_products()?)
    }

    fn pending_reminders(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<OrderReminder>, JobError> {
        Ok(self.services.queries.pending_order_reminders(start, end)?)
    }

    fn summary(&self) -> Result<CrmSummary, JobError> {
        Ok(self.services.reporting.summary()?)
    }
}

/// Backend calling a remote CRM API over HTTP.
///
/// Every request is bounded by the client timeout. Must be built and used
/// outside an async runtime (it wraps `reqwest::blocking`).
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, JobError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn decode<T: DeserializeOwned>(resp: reqwest::blocking::Response) -> Result<T, JobError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(JobError::Status(status.as_u16()));
        }
        resp.json::<T>().map_err(|e| JobError::Decode(e.to_string()))
    }
}

impl CrmBackend for HttpBackend {
    fn ping(&self) -> Result<(), JobError> {
        let resp = self
            .client
            .get(self.url("/health"))
            .send()
            .map_err(transport_error)?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(JobError::Status(status.as_u16()))
        }
    }

    fn restock_low_stock(&self) -> Result<RestockSummary, JobError> {
        let resp = self
            .client
            .post(self.url("/products/restock-low-stock"))
            .send()
            .map_err(transport_error)?;
        Self::decode(resp)
    }

    fn pending_reminders(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<OrderReminder>, JobError> {
        let resp = self
            .client
            .get(self.url("/orders/pending-reminders"))
            .query(&[
                ("start", start.to_rfc3339_opts(SecondsFormat::Millis, true)),
                ("end", end.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ])
            .send()
            .map_err(transport_error)?;
        Self::decode(resp)
    }

    fn summary(&self) -> Result<CrmSummary, JobError> {
        let resp = self
            .client
            .get(self.url("/reports/summary"))
            .send()
            .map_err(transport_error)?;
        Self::decode(resp)
    }
}

fn transport_error(e: reqwest::Error) -> JobError {
    if e.is_timeout() {
        JobError::Timeout(e.to_string())
    } else if e.is_decode() {
        JobError::Decode(e.to_string())
    } else {
        JobError::TransportUnreachable(e.to_string())
    }
}

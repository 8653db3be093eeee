use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;

use horn_core::model::{InquiryData, InquiryRecord};
use horn_core::repository::{InquiryRepository, StoreError};
use horn_store::app_config::{AgencyConfig, DispatchConfig};

use crate::mailto::{inquiry_subject, EmailHandoff};
use crate::summary::{generate_brief, SummaryError, SummaryGenerator};

/// Drives the submit step: persist the inquiry, draft the email brief,
/// hand off to the mail client and the background dispatch endpoint.
///
/// Persistence is the only hard requirement. Everything after it is
/// downgraded to a warning on the receipt — the inquiry already sits in
/// the store, and the agency would rather chase a missing email than
/// lose the lead.
pub struct SubmissionOrchestrator {
    repo: Arc<dyn InquiryRepository>,
    generator: Arc<dyn SummaryGenerator>,
    client: Client,
    dispatch: DispatchConfig,
    agency: AgencyConfig,
}

/// What the caller gets back from a submission. `handoff` is present only
/// when the email pipeline ran end to end.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub record: InquiryRecord,
    pub handoff: Option<EmailHandoff>,
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DispatchPayload<'a> {
    to: &'a str,
    subject: &'a str,
    summary: &'a str,
    raw_data: &'a InquiryData,
    timestamp: DateTime<Utc>,
}

impl SubmissionOrchestrator {
    pub fn new(
        repo: Arc<dyn InquiryRepository>,
        generator: Arc<dyn SummaryGenerator>,
        dispatch: DispatchConfig,
        agency: AgencyConfig,
    ) -> Self {
        Self {
            repo,
            generator,
            client: Client::new(),
            dispatch,
            agency,
        }
    }

    pub async fn submit(&self, data: InquiryData) -> Result<SubmissionReceipt, StoreError> {
        // Step 1 is the hard one: if the record cannot be persisted the
        // submission fails outright and nothing else runs.
        let record = self.repo.save(data).await?;

        match self.prepare_email(&record).await {
            Ok(handoff) => {
                tracing::info!(reference = %record.id, "inquiry submitted and email dispatched");
                Ok(SubmissionReceipt {
                    record,
                    handoff: Some(handoff),
                    warning: None,
                })
            }
            Err(err) => {
                tracing::warn!(
                    reference = %record.id,
                    error = %err,
                    "inquiry email failed; record kept locally"
                );
                let warning = format!(
                    "We could not send the inquiry email automatically. Your inquiry was saved \
                     locally as {} — please call us at {}.",
                    record.id, self.agency.phone
                );
                Ok(SubmissionReceipt {
                    record,
                    handoff: None,
                    warning: Some(warning),
                })
            }
        }
    }

    async fn prepare_email(&self, record: &InquiryRecord) -> Result<EmailHandoff, SubmissionError> {
        let brief = generate_brief(
            self.generator.as_ref(),
            &record.data,
            &self.agency.name,
            &self.agency.email,
        )
        .await?;

        let handoff = EmailHandoff::new(
            self.agency.email.clone(),
            inquiry_subject(&record.data),
            brief,
        );

        if self.dispatch.enabled {
            let payload = DispatchPayload {
                to: &handoff.to,
                subject: &handoff.subject,
                summary: &handoff.body,
                raw_data: &record.data,
                timestamp: record.submitted_at,
            };
            let response = self
                .client
                .post(&self.dispatch.endpoint)
                .json(&payload)
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(SubmissionError::DispatchFailed(response.status()));
            }
        }

        Ok(handoff)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error("Submission dispatch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network dispatch failed with status {0}")]
    DispatchFailed(reqwest::StatusCode),
}

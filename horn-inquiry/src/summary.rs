use async_trait::async_trait;

use horn_core::model::InquiryData;

/// Body used when the generation service returns nothing usable.
pub const FALLBACK_BRIEF: &str = "Background Inquiry data processed.";

/// Boundary to the text-completion service that drafts the internal email
/// brief. Keyed by a prompt string; returns free text used verbatim as
/// the email body. No schema validation is applied to the output.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, SummaryError>;
}

/// Prompt for the ticketing-team brief, embedding the full inquiry as JSON.
pub fn build_brief_prompt(
    inquiry: &InquiryData,
    agency_name: &str,
    agency_email: &str,
) -> Result<String, SummaryError> {
    let payload = serde_json::to_string(inquiry)?;
    Ok(format!(
        "Act as the Lead Coordinator for {agency_name}.\n\
         Format this travel inquiry into a professional internal brief for our ticketing team at {agency_email}.\n\
         Include critical flight dates, passenger passport status, and stopover requirements.\n\
         Data: {payload}"
    ))
}

/// Run the full brief flow: build the prompt, call the generator, and fall
/// back to a stock body when the service returns empty text.
pub async fn generate_brief(
    generator: &dyn SummaryGenerator,
    inquiry: &InquiryData,
    agency_name: &str,
    agency_email: &str,
) -> Result<String, SummaryError> {
    let prompt = build_brief_prompt(inquiry, agency_name, agency_email)?;
    let text = generator.complete(&prompt).await?;
    if text.trim().is_empty() {
        return Ok(FALLBACK_BRIEF.to_string());
    }
    Ok(text)
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation service returned an error: {0}")]
    Api(String),

    #[error("Could not interpret generation response: {0}")]
    InvalidResponse(String),

    #[error("Inquiry could not be serialized for the prompt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Canned generator for tests and offline runs.
pub struct MockSummaryGenerator {
    response: Option<String>,
    fail: bool,
}

impl MockSummaryGenerator {
    pub fn new() -> Self {
        Self {
            response: None,
            fail: false,
        }
    }

    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            fail: false,
        }
    }

    /// A generator whose every call fails, for exercising the soft-failure
    /// path of the submission flow.
    pub fn failing() -> Self {
        Self {
            response: None,
            fail: true,
        }
    }
}

impl Default for MockSummaryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummaryGenerator for MockSummaryGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String, SummaryError> {
        if self.fail {
            return Err(SummaryError::Api("simulated generation outage".to_string()));
        }
        Ok(self
            .response
            .clone()
            .unwrap_or_else(|| "Internal brief: inquiry details attached.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horn_core::model::InquiryData;

    #[tokio::test]
    async fn test_prompt_embeds_inquiry_json() {
        let mut inquiry = InquiryData::fresh();
        inquiry.origin = "Melbourne".to_string();
        inquiry.destination = "Dubai".to_string();

        let prompt =
            build_brief_prompt(&inquiry, "Horn Travel Agency", "info@horntravel.com.au").unwrap();
        assert!(prompt.contains("Lead Coordinator for Horn Travel Agency"));
        assert!(prompt.contains("info@horntravel.com.au"));
        assert!(prompt.contains("\"origin\":\"Melbourne\""));
        assert!(prompt.contains("passport status"));
    }

    #[tokio::test]
    async fn test_empty_completion_falls_back() {
        let generator = MockSummaryGenerator::with_response("   ");
        let brief = generate_brief(
            &generator,
            &InquiryData::fresh(),
            "Horn Travel Agency",
            "info@horntravel.com.au",
        )
        .await
        .unwrap();
        assert_eq!(brief, FALLBACK_BRIEF);
    }

    #[tokio::test]
    async fn test_failing_generator_propagates() {
        let generator = MockSummaryGenerator::failing();
        let result = generate_brief(
            &generator,
            &InquiryData::fresh(),
            "Horn Travel Agency",
            "info@horntravel.com.au",
        )
        .await;
        assert!(matches!(result, Err(SummaryError::Api(_))));
    }
}

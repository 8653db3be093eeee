use serde::Serialize;

use horn_core::model::InquiryData;

/// The email handed off to the visitor's mail client once a brief has
/// been generated. Navigation itself belongs to the caller; this is just
/// the addressing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailHandoff {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailHandoff {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// RFC 6068 mailto URI with percent-encoded subject and body.
    pub fn mailto_uri(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.to,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

/// Subject line for a new inquiry email.
pub fn inquiry_subject(inquiry: &InquiryData) -> String {
    format!("NEW INQUIRY: {} to {}", inquiry.origin, inquiry.destination)
}

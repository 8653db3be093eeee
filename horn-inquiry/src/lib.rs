pub mod export;
pub mod gemini;
pub mod mailto;
pub mod submission;
pub mod summary;
pub mod wizard;

pub use submission::{SubmissionOrchestrator, SubmissionReceipt};
pub use summary::{MockSummaryGenerator, SummaryError, SummaryGenerator};
pub use wizard::{InquirySession, Step, WizardError};

use std::path::Path;

use axum::extract::State;
use tracing::{info, warn};

use super::form::{SponsorSubmission, SubmissionForm};
use super::{MAIL_BODY, MAIL_SUBJECT, RESUMES_DIR, RESUME_FILES};
use crate::errors::AppError;
use crate::ledger::SponsorRecord;
use crate::mailer::AttachmentSpec;
use crate::state::AppState;

/// POST /submit-form
///
/// Validates the submission, emails the resume set to the submitter, then
/// appends the contact details to the sponsor ledger. The ledger write is
/// gated strictly behind a confirmed send: a sponsor is never recorded
/// unless the resume mail went out.
pub async fn handle_submit(
    State(state): State<AppState>,
    SubmissionForm(submission): SubmissionForm,
) -> Result<String, AppError> {
    process_submission(&state, submission).await
}

pub(crate) async fn process_submission(
    state: &AppState,
    submission: SponsorSubmission,
) -> Result<String, AppError> {
    // Presence-of-email is the only validation; nothing may run before it.
    if submission.email.is_empty() {
        return Err(AppError::Validation("Email is required.".to_string()));
    }

    info!(
        company = %submission.company_name,
        email = %submission.email,
        "Received sponsor submission"
    );

    let attachments = resume_attachments();
    state
        .mailer
        .send(&submission.email, MAIL_SUBJECT, MAIL_BODY, &attachments)
        .await?;

    let record = SponsorRecord {
        company_name: submission.company_name,
        contact_name: submission.contact_name,
        email: submission.email.clone(),
        phone: submission.phone,
    };

    if let Err(e) = state.ledger.append(record).await {
        // The mail is already out; there is no compensating action.
        warn!(
            email = %submission.email,
            "Resumes sent but sponsor not recorded: {e}"
        );
        return Err(AppError::Persistence(e));
    }

    Ok(format!(
        "Form submitted successfully! Emails sent to {}",
        submission.email
    ))
}

fn resume_attachments() -> Vec<AttachmentSpec> {
    RESUME_FILES
        .iter()
        .map(|name| AttachmentSpec {
            filename: (*name).to_string(),
            path: Path::new(RESUMES_DIR).join(name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerStore;
    use crate::mailer::mock::MockMailer;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn submission(company: &str, contact: &str, email: &str, phone: &str) -> SponsorSubmission {
        SponsorSubmission {
            company_name: company.to_string(),
            contact_name: contact.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    fn state_with(mailer: Arc<MockMailer>, ledger_path: std::path::PathBuf) -> AppState {
        AppState {
            mailer,
            ledger: Arc::new(LedgerStore::new(ledger_path)),
        }
    }

    #[tokio::test]
    async fn test_missing_email_sends_nothing_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sponsor_data.csv");
        let mailer = Arc::new(MockMailer::succeeding());
        let state = state_with(mailer.clone(), path.clone());

        let result = process_submission(&state, submission("Acme", "Jo", "", "555")).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(mailer.call_count(), 0);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_successful_submission_sends_once_and_appends_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sponsor_data.csv");
        let mailer = Arc::new(MockMailer::succeeding());
        let state = state_with(mailer.clone(), path);

        let message = process_submission(&state, submission("Acme", "Jo", "jo@acme.com", "555"))
            .await
            .unwrap();

        assert!(message.contains("jo@acme.com"));
        assert_eq!(mailer.call_count(), 1);

        let rows = state.ledger.read_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].company_name, "Acme");
        assert_eq!(rows[0].contact_name, "Jo");
        assert_eq!(rows[0].email, "jo@acme.com");
        assert_eq!(rows[0].phone, "555");
    }

    #[tokio::test]
    async fn test_send_failure_leaves_ledger_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sponsor_data.csv");
        let mailer = Arc::new(MockMailer::failing());
        let state = state_with(mailer.clone(), path.clone());

        let result = process_submission(&state, submission("Acme", "Jo", "jo@acme.com", "555")).await;

        assert!(matches!(result, Err(AppError::Notification(_))));
        assert_eq!(mailer.call_count(), 1);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_new_record_lands_after_existing_ones() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sponsor_data.csv");
        let mailer = Arc::new(MockMailer::succeeding());
        let state = state_with(mailer, path);

        for email in ["first@acme.com", "second@acme.com", "third@acme.com"] {
            process_submission(&state, submission("Acme", "Jo", email, "555"))
                .await
                .unwrap();
        }

        let rows = state.ledger.read_all().await.unwrap();
        let emails: Vec<&str> = rows.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(emails, ["first@acme.com", "second@acme.com", "third@acme.com"]);
    }

    #[tokio::test]
    async fn test_duplicate_submissions_produce_two_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sponsor_data.csv");
        let mailer = Arc::new(MockMailer::succeeding());
        let state = state_with(mailer.clone(), path);

        let s = submission("Acme", "Jo", "jo@acme.com", "555");
        process_submission(&state, s.clone()).await.unwrap();
        process_submission(&state, s).await.unwrap();

        assert_eq!(mailer.call_count(), 2);
        assert_eq!(state.ledger.read_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ledger_failure_after_send_is_a_persistence_error() {
        let dir = tempdir().unwrap();
        // The ledger path is a directory: the read side fails after the send.
        let mailer = Arc::new(MockMailer::succeeding());
        let state = state_with(mailer.clone(), dir.path().to_path_buf());

        let result = process_submission(&state, submission("Acme", "Jo", "jo@acme.com", "555")).await;

        assert!(matches!(result, Err(AppError::Persistence(_))));
        // The email did go out; the inconsistency is surfaced, not hidden.
        assert_eq!(mailer.call_count(), 1);
    }

    #[tokio::test]
    async fn test_optional_fields_may_be_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sponsor_data.csv");
        let mailer = Arc::new(MockMailer::succeeding());
        let state = state_with(mailer, path);

        process_submission(&state, submission("", "", "anon@acme.com", ""))
            .await
            .unwrap();

        let rows = state.ledger.read_all().await.unwrap();
        assert_eq!(rows[0].company_name, "");
        assert_eq!(rows[0].email, "anon@acme.com");
    }
}

use axum::{
    async_trait,
    extract::{Form, FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::Deserialize;

use crate::errors::AppError;

/// One sponsor contact form submission. Everything arrives as free text and
/// missing fields map to empty strings; only `email` is required, and that is
/// checked by the handler, not here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SponsorSubmission {
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(rename = "contactName")]
    pub contact_name: String,
    pub email: String,
    pub phone: String,
}

/// Extracts a `SponsorSubmission` from either a `multipart/form-data` or an
/// `application/x-www-form-urlencoded` body. The landing page posts
/// multipart; plain form posts are accepted too. Only text fields are read —
/// file parts are skipped, and unknown field names are ignored.
pub struct SubmissionForm(pub SponsorSubmission);

#[async_trait]
impl<S> FromRequest<S> for SubmissionForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(format!("Malformed form body: {e}")))?;

            let mut submission = SponsorSubmission::default();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| AppError::Validation(format!("Malformed form body: {e}")))?
            {
                if field.file_name().is_some() {
                    // text-only endpoint
                    continue;
                }
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed form body: {e}")))?;
                match name.as_str() {
                    "companyName" => submission.company_name = value,
                    "contactName" => submission.contact_name = value,
                    "email" => submission.email = value,
                    "phone" => submission.phone = value,
                    _ => {}
                }
            }
            Ok(SubmissionForm(submission))
        } else {
            let Form(submission) = Form::<SponsorSubmission>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(format!("Malformed form body: {e}")))?;
            Ok(SubmissionForm(submission))
        }
    }
}

//! Sponsor form submission — extraction and orchestration.
//!
//! One accepted submission produces exactly one outbound email and exactly
//! one ledger row, with the row gated strictly behind a confirmed send.

pub mod form;
pub mod handlers;

/// Directory the resume PDFs are read from at send time.
pub const RESUMES_DIR: &str = "resumes";

/// The fixed attachment set. Static configuration: every accepted submission
/// receives exactly these files, in this order — never derived per request.
pub const RESUME_FILES: [&str; 4] = [
    "resume1.pdf",
    "resume2.pdf",
    "resume3.pdf",
    "resume4.pdf",
];

pub const MAIL_SUBJECT: &str = "Resumes from Event";
pub const MAIL_BODY: &str = "Thank you for attending our event! Here are the resumes.";

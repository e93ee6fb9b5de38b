use std::sync::Arc;

use crate::ledger::LedgerStore;
use crate::mailer::ResumeMailer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable mail transport. Production: `SmtpMailer`; tests swap in a mock.
    pub mailer: Arc<dyn ResumeMailer>,
    /// Sole owner of the sponsor ledger file.
    pub ledger: Arc<LedgerStore>,
}

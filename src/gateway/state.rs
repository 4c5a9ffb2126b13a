use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::AuthSettings;
use crate::documents::DocumentService;

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    /// Admin sign-in and credential validation
    pub auth: Arc<AuthService>,
    /// Pinning provider and ledger access
    pub documents: Arc<DocumentService>,
    /// Cookie names and lifetimes
    pub settings: AuthSettings,
}

impl AppState {
    pub fn new(auth: AuthService, documents: DocumentService, settings: AuthSettings) -> Self {
        Self {
            auth: Arc::new(auth),
            documents: Arc::new(documents),
            settings,
        }
    }
}

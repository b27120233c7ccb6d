use std::sync::Arc;

use services::AppServices;

use crate::auth::TokenVerifier;

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    pub services: AppServices,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl ApiState {
    #[must_use]
    pub fn new(services: AppServices, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { services, verifier }
    }
}

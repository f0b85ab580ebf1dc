use std::sync::Arc;

use crate::agents::Console;
use crate::domain::repositories::{OperatorRepository, PreferenceRepository};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub console: Console,
    pub operators: Arc<dyn OperatorRepository>,
    pub preferences: Arc<dyn PreferenceRepository>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(
        console: Console,
        operators: Arc<dyn OperatorRepository>,
        preferences: Arc<dyn PreferenceRepository>,
        jwt_secret: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            console,
            operators,
            preferences,
            jwt_secret: jwt_secret.into(),
        }
    }
}

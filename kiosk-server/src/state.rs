use std::sync::Arc;

use kiosk_core::calendar::CalendarEnv;
use kiosk_core::{KioskConfig, KioskResult, Navigator};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // The template is reloaded and directories rescanned on every request,
    // so only the navigator (and its HTTP client) is shared.
    navigator: Arc<Navigator>,
}

impl AppState {
    pub fn new(config: &KioskConfig, env: CalendarEnv) -> KioskResult<Self> {
        Ok(Self::from_navigator(Navigator::from_config(config, env)?))
    }

    pub fn from_navigator(navigator: Navigator) -> Self {
        AppState {
            navigator: Arc::new(navigator),
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }
}

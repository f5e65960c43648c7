// ABOUTME: Shared state handed to every request handler.
// ABOUTME: Holds only the component factory; clients are created per request.

use std::sync::Arc;

use crate::deploy::ComponentFactory;

#[derive(Clone)]
pub struct AppState {
    pub factory: Arc<dyn ComponentFactory>,
}

impl AppState {
    pub fn new(factory: Arc<dyn ComponentFactory>) -> Self {
        Self { factory }
    }
}

pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::advisor::Advisor;
use crate::catalog::{CatalogSource, Product};
use std::sync::Arc;
pub use dispatcher::create_command_registry;

/// Work a command asks the session loop to run after it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    GenerateRoutine,
}

pub struct PickerState {
    pub advisor: Arc<Advisor>,
    pub catalog: Arc<dyn CatalogSource>,
    /// Products of the last category filter; `None` until one is chosen.
    pub view: Option<Vec<Product>>,
    pub category: Option<String>,
    pub should_continue: bool,
    pub pending: Option<PendingAction>,
}

impl PickerState {
    pub fn new(advisor: Arc<Advisor>, catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            advisor,
            catalog,
            view: None,
            category: None,
            should_continue: true,
            pending: None,
        }
    }

    pub fn view(&self) -> &[Product] {
        self.view.as_deref().unwrap_or_default()
    }
}

use super::{
    PickerState,
    handler::{
        CategoriesCommand, CategoryCommand, GenerateCommand, HelpCommand, HistoryCommand,
        ModelCommand, ProductsCommand, QuitCommand, RemoveCommand, SelectCommand, SelectedCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::GlowError;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[&str],
        state: &mut PickerState,
    ) -> Result<Option<String>, GlowError> {
        self.registry.execute(command, args, state)
    }

    /// Splits a `/name arg...` line and runs it.
    pub fn execute_line(
        &self,
        line: &str,
        state: &mut PickerState,
    ) -> Result<Option<String>, GlowError> {
        let parts: Vec<&str> = line.trim_start_matches('/').split_whitespace().collect();
        match parts.split_first() {
            Some((command, args)) => self.execute(command, args, state),
            None => Ok(None),
        }
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("help", HelpCommand);
    registry.register("categories", CategoriesCommand);
    registry.register("category", CategoryCommand);
    registry.register("products", ProductsCommand);
    registry.register("select", SelectCommand);
    registry.register("remove", RemoveCommand);
    registry.register("selected", SelectedCommand);
    registry.register("generate", GenerateCommand);
    registry.register("history", HistoryCommand);
    registry.register("model", ModelCommand);

    CommandDispatcher::new(Arc::new(registry))
}

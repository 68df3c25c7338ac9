use crate::commands::handler::CommandHandler;
use crate::core::error::GlowError;
use std::collections::HashMap;
use std::sync::Arc;

pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<C: CommandHandler + 'static>(&mut self, name: &str, command: C) {
        self.handlers.insert(name.to_string(), Arc::new(command));
    }

    pub fn execute(
        &self,
        name: &str,
        args: &[&str],
        state: &mut super::PickerState,
    ) -> Result<Option<String>, GlowError> {
        let Some(handler) = self.handlers.get(name) else {
            let message = match self.closest(name) {
                Some(suggestion) => {
                    format!("Unknown command: /{}. Did you mean /{}?", name, suggestion)
                }
                None => format!("Unknown command: /{}. Type /help for commands.", name),
            };
            return Err(GlowError::Input(message));
        };
        handler.execute(state, args)
    }

    /// Registered name within two edits of `name`, for typo suggestions.
    fn closest(&self, name: &str) -> Option<&str> {
        self.handlers
            .keys()
            .map(|candidate| (edit_distance(name, candidate), candidate))
            .filter(|(distance, _)| *distance <= 2)
            .min()
            .map(|(_, candidate)| candidate.as_str())
    }

    pub fn get_command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handler::{CategoriesCommand, CategoryCommand, GenerateCommand};

    #[test]
    fn edit_distance_counts_single_edits() {
        assert_eq!(edit_distance("category", "category"), 0);
        assert_eq!(edit_distance("categry", "category"), 1);
        assert_eq!(edit_distance("selcet", "select"), 2);
        assert_eq!(edit_distance("", "quit"), 4);
    }

    #[test]
    fn typos_suggest_the_closest_command() {
        let mut registry = CommandRegistry::new();
        registry.register("category", CategoryCommand);
        registry.register("categories", CategoriesCommand);
        registry.register("generate", GenerateCommand);

        assert_eq!(registry.closest("categry"), Some("category"));
        assert_eq!(registry.closest("genrate"), Some("generate"));
        assert_eq!(registry.closest("teleport"), None);
    }
}

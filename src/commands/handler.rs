use super::{PendingAction, PickerState};
use crate::catalog::{categories, filter_by_category};
use crate::core::error::GlowError;
use crate::display;

use console::style;

pub trait CommandHandler: Send + Sync {
    fn execute(&self, state: &mut PickerState, args: &[&str]) -> Result<Option<String>, GlowError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct CategoriesCommand;
pub struct CategoryCommand;
pub struct ProductsCommand;
pub struct SelectCommand;
pub struct RemoveCommand;
pub struct SelectedCommand;
pub struct GenerateCommand;
pub struct HistoryCommand;
pub struct ModelCommand;

impl CommandHandler for QuitCommand {
    fn execute(&self, state: &mut PickerState, _args: &[&str]) -> Result<Option<String>, GlowError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the session"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(
        &self,
        _state: &mut PickerState,
        _args: &[&str],
    ) -> Result<Option<String>, GlowError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = vec![
            title.to_string(),
            CategoriesCommand.help().to_string(),
            CategoryCommand.help().to_string(),
            ProductsCommand.help().to_string(),
            SelectCommand.help().to_string(),
            RemoveCommand.help().to_string(),
            SelectedCommand.help().to_string(),
            GenerateCommand.help().to_string(),
            HistoryCommand.help().to_string(),
            ModelCommand.help().to_string(),
            HelpCommand.help().to_string(),
            QuitCommand.help().to_string(),
            style("Anything else is sent to the beauty advisor as a question.")
                .dim()
                .to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for CategoriesCommand {
    fn execute(&self, state: &mut PickerState, _args: &[&str]) -> Result<Option<String>, GlowError> {
        let products = state.catalog.load()?;
        Ok(Some(display::render_categories(&categories(&products))))
    }

    fn help(&self) -> &'static str {
        "/categories - List product categories"
    }
}

impl CommandHandler for CategoryCommand {
    fn execute(&self, state: &mut PickerState, args: &[&str]) -> Result<Option<String>, GlowError> {
        if args.is_empty() {
            return Ok(Some("Please specify a category".to_string()));
        }

        let category = args.join(" ");
        let products = state.catalog.load()?;
        let view = filter_by_category(products, &category);
        tracing::debug!(%category, count = view.len(), "category filter applied");

        let advisor = state.advisor.clone();
        let rendered = display::render_products(Some(&view), |id| advisor.is_selected(id));
        state.view = Some(view);
        state.category = Some(category);
        Ok(Some(rendered))
    }

    fn help(&self) -> &'static str {
        "/category <name> - Show the products in a category"
    }
}

impl CommandHandler for ProductsCommand {
    fn execute(&self, state: &mut PickerState, _args: &[&str]) -> Result<Option<String>, GlowError> {
        let advisor = &state.advisor;
        let products = display::render_products(state.view.as_deref(), |id| advisor.is_selected(id));
        match &state.category {
            Some(category) => Ok(Some(format!(
                "{}\n{}",
                style(category).bold().underlined(),
                products
            ))),
            None => Ok(Some(products)),
        }
    }

    fn help(&self) -> &'static str {
        "/products - Show the products of the current category"
    }
}

impl CommandHandler for SelectCommand {
    fn execute(&self, state: &mut PickerState, args: &[&str]) -> Result<Option<String>, GlowError> {
        if args.is_empty() {
            return Ok(Some("Please specify a product id".to_string()));
        }

        let mut unknown = Vec::new();
        for id in args {
            if !state.advisor.toggle(id, state.view()).is_change() {
                unknown.push(*id);
            }
        }

        if unknown.is_empty() {
            Ok(None)
        } else {
            Ok(Some(format!(
                "Not in the current view: {}",
                unknown.join(", ")
            )))
        }
    }

    fn help(&self) -> &'static str {
        "/select <id>... - Select or deselect products from the current view"
    }
}

impl CommandHandler for RemoveCommand {
    fn execute(&self, state: &mut PickerState, args: &[&str]) -> Result<Option<String>, GlowError> {
        if args.is_empty() {
            return Ok(Some("Please specify a product id to remove".to_string()));
        }

        for id in args {
            state.advisor.remove(id);
        }
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/remove <id>... - Remove products from the selection"
    }
}

impl CommandHandler for SelectedCommand {
    fn execute(&self, state: &mut PickerState, _args: &[&str]) -> Result<Option<String>, GlowError> {
        Ok(Some(display::render_selection(&state.advisor.selection())))
    }

    fn help(&self) -> &'static str {
        "/selected - Show the selected products"
    }
}

impl CommandHandler for GenerateCommand {
    fn execute(&self, state: &mut PickerState, _args: &[&str]) -> Result<Option<String>, GlowError> {
        state.pending = Some(PendingAction::GenerateRoutine);
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/generate - Generate a routine for the selected products"
    }
}

impl CommandHandler for HistoryCommand {
    fn execute(&self, state: &mut PickerState, _args: &[&str]) -> Result<Option<String>, GlowError> {
        let history = state.advisor.history();
        // Skip the system prompt.
        if history.len() <= 1 {
            return Ok(Some("No conversation yet.".to_string()));
        }
        Ok(Some(display::render_history(&history[1..])))
    }

    fn help(&self) -> &'static str {
        "/history - Show the conversation window sent to the advisor"
    }
}

impl CommandHandler for ModelCommand {
    fn execute(&self, state: &mut PickerState, args: &[&str]) -> Result<Option<String>, GlowError> {
        if args.is_empty() {
            Ok(Some(format!(
                "Current model: {} ({})",
                state.advisor.model(),
                state.advisor.provider_name()
            )))
        } else {
            state.advisor.set_model(args[0]);
            Ok(Some(format!("Model changed to: {}", args[0])))
        }
    }

    fn help(&self) -> &'static str {
        "/model <name> - Show or change the current model"
    }
}

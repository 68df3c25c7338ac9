use crate::commands::dispatcher::CommandDispatcher;
use crate::core::error::GlowError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, EditMode, Editor, Helper};
use std::borrow::Cow;

/// Line-editor helper: slash-command completion plus history hints.
pub struct PickerHelper {
    commands: CommandDispatcher,
    history_hinter: HistoryHinter,
}

impl PickerHelper {
    pub fn new(commands: CommandDispatcher) -> Self {
        Self {
            commands,
            history_hinter: HistoryHinter {},
        }
    }

    fn command_matches(&self, prefix: &str) -> Vec<String> {
        self.commands
            .get_command_names()
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .collect()
    }
}

impl Helper for PickerHelper {}

impl Completer for PickerHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Only the command word itself is completed.
        if !line.starts_with('/') || line[..pos].contains(' ') {
            return Ok((pos, Vec::new()));
        }

        let matches = self
            .command_matches(&line[1..pos])
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((1, matches))
    }
}

impl Hinter for PickerHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        if line.starts_with('/') && pos == line.len() && !line.contains(' ') {
            let prefix = &line[1..];
            let matches = self.command_matches(prefix);
            if let [only] = matches.as_slice() {
                return Some(only[prefix.len()..].to_string());
            }
        }
        self.history_hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for PickerHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(style(hint).dim().to_string())
    }
}

impl Validator for PickerHelper {}

/// Creates a configured rustyline editor. Input history lives only for the
/// session.
pub fn create_editor(
    commands: CommandDispatcher,
) -> Result<Editor<PickerHelper, DefaultHistory>, GlowError> {
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| GlowError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(PickerHelper::new(commands)));

    Ok(editor)
}

/// Reads a line; `None` on Ctrl-C or Ctrl-D.
pub fn read_input(
    editor: &mut Editor<PickerHelper, DefaultHistory>,
) -> Result<Option<String>, GlowError> {
    let prompt = style("✿ ").bold().magenta().to_string();
    match editor.readline(&prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Goodbye!");
            Ok(None)
        }
        Err(err) => Err(GlowError::Input(format!("Input error: {}", err))),
    }
}

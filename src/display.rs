use crate::advisor::surface::{ChatMessage, ChatSurface, LoadingToken, MessageKind};
use crate::catalog::Product;
use crate::providers::{Message, Role};
use console::{Term, style};
use std::collections::HashSet;
use std::sync::Mutex;
use termimad::MadSkin;
use tracing::level_filters::LevelFilter;

pub const PLACEHOLDER_MESSAGE: &str = "Select a category to view products";
pub const EMPTY_TRAY_MESSAGE: &str = "No products selected";

fn terminal_width() -> usize {
    let width = Term::stdout().size().1 as usize;
    std::cmp::min(width.saturating_sub(4), 100).max(50)
}

/// Greedy word wrap on character counts.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

pub fn render_categories(categories: &[String]) -> String {
    if categories.is_empty() {
        return style("The catalog has no categories.").dim().to_string();
    }
    let mut out = vec![style("Categories").bold().underlined().to_string()];
    out.extend(categories.iter().map(|c| format!("  • {}", c)));
    out.push(style("Use /category <name> to browse one.").dim().to_string());
    out.join("\n")
}

/// Product grid for the current view; selected products are marked.
pub fn render_products(products: Option<&[Product]>, is_selected: impl Fn(&str) -> bool) -> String {
    let Some(products) = products else {
        return style(PLACEHOLDER_MESSAGE).dim().to_string();
    };
    if products.is_empty() {
        return style("No products in this category.").dim().to_string();
    }

    products
        .iter()
        .map(|p| {
            let marker = if is_selected(p.id.as_str()) {
                style("[x]").bold().green()
            } else {
                style("[ ]").dim()
            };
            format!(
                "{} {} {} {}",
                marker,
                style(format!("#{}", p.id)).cyan(),
                style(&p.name).bold(),
                style(format!("({})", p.brand)).dim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The selection tray, with the command that removes each entry.
pub fn render_selection(selection: &[Product]) -> String {
    if selection.is_empty() {
        return style(EMPTY_TRAY_MESSAGE).dim().to_string();
    }

    let mut out = vec![style(format!("Selected Products ({})", selection.len()))
        .bold()
        .magenta()
        .to_string()];
    for p in selection {
        out.push(format!(
            "  {} {} {}  {}",
            style(format!("#{}", p.id)).cyan(),
            style(&p.name).bold(),
            style(format!("({})", p.brand)).dim(),
            style(format!("/remove {}", p.id)).dim().red()
        ));
    }
    out.join("\n")
}

pub fn render_history(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::System => style("System").bold().yellow(),
                Role::User => style("You").bold().cyan(),
                Role::Assistant => style("Beauty Advisor").bold().magenta(),
            };
            format!("{}: {}", role, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Transcript pane on stdout.
pub struct TerminalSurface {
    skin: MadSkin,
    active_loading: Mutex<HashSet<LoadingToken>>,
    // Token whose indicator is still the last printed line, if any.
    trailing: Mutex<Option<LoadingToken>>,
    next_token: Mutex<u64>,
    // Log output on stderr can land below the indicator, so erasing is only
    // safe while the subscriber is quiet.
    erase_loading: bool,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::with_line_erase(LevelFilter::current() <= LevelFilter::WARN)
    }

    pub fn with_line_erase(erase_loading: bool) -> Self {
        Self {
            skin: MadSkin::default(),
            active_loading: Mutex::new(HashSet::new()),
            trailing: Mutex::new(None),
            next_token: Mutex::new(0),
            erase_loading,
        }
    }

    /// Whether the indicator for `token` is still the last printed line and
    /// may be erased. Forgets the trailing token either way.
    fn take_trailing(&self, token: LoadingToken) -> bool {
        let Ok(mut trailing) = self.trailing.lock() else {
            return false;
        };
        if *trailing != Some(token) {
            return false;
        }
        *trailing = None;
        self.erase_loading
    }

    fn print(&self, text: &str) {
        if let Ok(mut trailing) = self.trailing.lock() {
            *trailing = None;
        }
        println!("{}", text);
    }

    fn timestamp() -> String {
        style(chrono::Local::now().format("%H:%M").to_string())
            .dim()
            .to_string()
    }

    fn boxed(&self, title: &str, body: &str) -> String {
        let width = terminal_width();
        let mut out = vec![
            style(format!("┌─ {} {}", title, "─".repeat(width.saturating_sub(title.len() + 4))))
                .dim()
                .magenta()
                .to_string(),
        ];
        out.push(self.skin.term_text(body).to_string().trim_end().to_string());
        out.push(style(format!("└{}", "─".repeat(width.saturating_sub(1)))).dim().magenta().to_string());
        out.join("\n")
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSurface for TerminalSurface {
    fn show_message(&self, message: ChatMessage) {
        let rendered = match message.kind {
            MessageKind::User => format!(
                "{} {} {}",
                Self::timestamp(),
                style("You:").bold().cyan(),
                message.text
            ),
            MessageKind::Advisor => format!(
                "{} {}\n{}",
                Self::timestamp(),
                style("Beauty Advisor:").bold().magenta(),
                self.skin.term_text(&message.text)
            ),
            MessageKind::Routine => self.boxed("Your Personalized Routine", &message.text),
            MessageKind::Notice => wrap_text(&message.text, terminal_width())
                .into_iter()
                .map(|l| style(l).yellow().to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            MessageKind::Error => format!("{} {}", style("✗").bold().red(), style(&message.text).red()),
        };
        self.print(&rendered);
    }

    fn show_loading(&self, label: &str) -> LoadingToken {
        let token = match self.next_token.lock() {
            Ok(mut next) => {
                *next += 1;
                LoadingToken(*next)
            }
            Err(_) => LoadingToken(0),
        };
        if let Ok(mut active) = self.active_loading.lock() {
            active.insert(token);
        }
        println!("{} {}", style("⋯").bold().blue(), style(label).dim());
        if let Ok(mut trailing) = self.trailing.lock() {
            *trailing = Some(token);
        }
        token
    }

    fn clear_loading(&self, token: LoadingToken) {
        let was_active = self
            .active_loading
            .lock()
            .map(|mut active| active.remove(&token))
            .unwrap_or(false);
        if !was_active {
            tracing::warn!(token = token.0, "loading indicator cleared twice");
            return;
        }

        if self.take_trailing(token) {
            Term::stdout().clear_last_lines(1).ok();
        }
    }

    fn selection_changed(&self, selection: &[Product]) {
        self.print(&render_selection(selection));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_product;
    use console::strip_ansi_codes;

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let lines = wrap_text("apply serum after cleansing and before moisturizer", 20);
        assert_eq!(
            lines,
            vec!["apply serum after", "cleansing and before", "moisturizer"]
        );
    }

    #[test]
    fn wrap_keeps_blank_paragraphs() {
        assert_eq!(wrap_text("Step 1\n\nStep 2", 40), vec!["Step 1", "", "Step 2"]);
    }

    #[test]
    fn products_show_placeholder_before_a_category_is_chosen() {
        let rendered = render_products(None, |_| false);
        assert_eq!(strip_ansi_codes(&rendered), PLACEHOLDER_MESSAGE);
    }

    #[test]
    fn products_mark_selected_entries() {
        let products = vec![sample_product("1", "serum"), sample_product("2", "serum")];
        let rendered = render_products(Some(&products), |id| id == "2");
        let plain = strip_ansi_codes(&rendered).to_string();

        let lines: Vec<_> = plain.lines().collect();
        assert_eq!(lines[0], "[ ] #1 Product 1 (CeraVe)");
        assert_eq!(lines[1], "[x] #2 Product 2 (CeraVe)");
    }

    #[test]
    fn empty_tray_says_so() {
        assert_eq!(strip_ansi_codes(&render_selection(&[])), EMPTY_TRAY_MESSAGE);
    }

    #[test]
    fn tray_lists_remove_commands() {
        let rendered = render_selection(&[sample_product("7", "mask")]);
        let plain = strip_ansi_codes(&rendered).to_string();
        assert!(plain.starts_with("Selected Products (1)"));
        assert!(plain.contains("#7 Product 7 (CeraVe)  /remove 7"));
    }

    #[test]
    fn history_labels_roles() {
        let rendered = render_history(&[Message::user("hi"), Message::assistant("hello")]);
        assert_eq!(
            strip_ansi_codes(&rendered),
            "You: hi\n\nBeauty Advisor: hello"
        );
    }

    #[test]
    fn loading_tokens_are_unique_and_cleared_once() {
        let surface = TerminalSurface::with_line_erase(false);
        let first = surface.show_loading("Thinking...");
        let second = surface.show_loading("Thinking...");
        assert_ne!(first, second);

        surface.clear_loading(first);
        surface.clear_loading(first);
        assert_eq!(surface.active_loading.lock().unwrap().len(), 1);
        surface.clear_loading(second);
        assert!(surface.active_loading.lock().unwrap().is_empty());
    }

    #[test]
    fn indicator_is_erased_only_while_it_is_the_last_line() {
        let surface = TerminalSurface::with_line_erase(true);
        let token = surface.show_loading("Thinking...");
        assert!(surface.take_trailing(token));
        assert!(!surface.take_trailing(token));

        let token = surface.show_loading("Thinking...");
        surface.print("Beauty Advisor: hello");
        assert!(!surface.take_trailing(token));
    }

    #[test]
    fn indicator_is_kept_when_logs_share_the_terminal() {
        let surface = TerminalSurface::with_line_erase(false);
        let token = surface.show_loading("Creating your personalized routine...");
        assert!(!surface.take_trailing(token));
    }
}

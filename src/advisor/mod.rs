//! Selection and conversation state behind the picker, plus the two request
//! flows that talk to the completion endpoint: routine generation and
//! follow-up questions.
//!
//! At most one request is in flight per advisor. A submission made while a
//! request is pending is answered with [`TurnOutcome::Busy`] and changes
//! nothing.

pub mod surface;

use crate::catalog::Product;
use crate::history::{ConversationHistory, DEFAULT_HISTORY_LIMIT};
use crate::prompts;
use crate::providers::{CompletionParams, CompletionRequest, LLMProvider, Message};
use crate::selection::{SelectionChanged, SelectionSet};
use crate::topic::TopicGate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use surface::{ChatMessage, ChatSurface, LoadingGuard, MessageKind};

/// How a submission ended. Every variant leaves the advisor idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Fulfilled(String),
    Rejected,
    EmptySelection,
    Failed,
    Busy,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct AdvisorSettings {
    pub model: String,
    pub history_limit: usize,
    pub routine: CompletionParams,
    pub question: CompletionParams,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            routine: CompletionParams::ROUTINE,
            question: CompletionParams::QUESTION,
        }
    }
}

pub struct Advisor {
    selection: Mutex<SelectionSet>,
    history: Mutex<ConversationHistory>,
    model: Mutex<String>,
    routine_params: CompletionParams,
    question_params: CompletionParams,
    gate: Box<dyn TopicGate>,
    provider: Box<dyn LLMProvider>,
    surface: Arc<dyn ChatSurface>,
    busy: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Advisor {
    pub fn new(
        settings: AdvisorSettings,
        provider: Box<dyn LLMProvider>,
        gate: Box<dyn TopicGate>,
        surface: Arc<dyn ChatSurface>,
    ) -> Self {
        Self {
            selection: Mutex::new(SelectionSet::new()),
            history: Mutex::new(ConversationHistory::new(
                prompts::SYSTEM_PROMPT,
                settings.history_limit,
            )),
            model: Mutex::new(settings.model),
            routine_params: settings.routine,
            question_params: settings.question,
            gate,
            provider,
            surface,
            busy: AtomicBool::new(false),
        }
    }

    pub fn toggle(&self, product_id: &str, view: &[Product]) -> SelectionChanged {
        let (changed, snapshot) = {
            let mut selection = lock(&self.selection);
            let changed = selection.toggle(product_id, view);
            tracing::trace!(product_id, selected = selection.len(), "selection toggled");
            (changed, selection.list())
        };
        self.notify_selection(&changed, &snapshot);
        changed
    }

    pub fn remove(&self, product_id: &str) -> SelectionChanged {
        let (changed, snapshot) = {
            let mut selection = lock(&self.selection);
            let changed = selection.remove(product_id);
            tracing::trace!(product_id, selected = selection.len(), "selection removal");
            (changed, selection.list())
        };
        self.notify_selection(&changed, &snapshot);
        changed
    }

    fn notify_selection(&self, changed: &SelectionChanged, snapshot: &[Product]) {
        match changed {
            SelectionChanged::Added(p) => tracing::debug!(id = %p.id, "product selected"),
            SelectionChanged::Removed(p) => tracing::debug!(id = %p.id, "product deselected"),
            SelectionChanged::Unchanged => return,
        }
        self.surface.selection_changed(snapshot);
    }

    pub fn selection(&self) -> Vec<Product> {
        lock(&self.selection).list()
    }

    pub fn is_selected(&self, product_id: &str) -> bool {
        lock(&self.selection).contains(product_id)
    }

    pub fn history(&self) -> Vec<Message> {
        lock(&self.history).snapshot()
    }

    pub fn model(&self) -> String {
        lock(&self.model).clone()
    }

    pub fn set_model(&self, model: &str) {
        *lock(&self.model) = model.to_string();
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(&self.busy))
    }

    fn notice(&self, kind: MessageKind, text: &str) {
        self.surface.show_message(ChatMessage::new(kind, text));
    }

    fn request(&self, messages: Vec<Message>, params: CompletionParams) -> CompletionRequest {
        CompletionRequest {
            model: self.model(),
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        }
    }

    /// Asks for a usage routine covering the current selection.
    ///
    /// On success the routine becomes one assistant entry in the history; the
    /// instruction prompt itself is not kept.
    pub async fn generate_routine(&self) -> TurnOutcome {
        let Some(_busy) = self.try_begin() else {
            self.notice(MessageKind::Notice, prompts::BUSY_MESSAGE);
            return TurnOutcome::Busy;
        };

        let products = {
            let selection = lock(&self.selection);
            if selection.is_empty() {
                drop(selection);
                self.notice(MessageKind::Notice, prompts::EMPTY_SELECTION_MESSAGE);
                return TurnOutcome::EmptySelection;
            }
            selection.list()
        };

        let mut messages = self.history();
        messages.push(Message::user(prompts::routine_prompt(&products)));
        let request = self.request(messages, self.routine_params);

        tracing::info!(products = products.len(), model = %request.model, "generating routine");
        let loading = LoadingGuard::show(self.surface.as_ref(), prompts::ROUTINE_LOADING);
        let result = self.provider.complete(&request).await;
        drop(loading);

        match result {
            Ok(routine) => {
                {
                    let mut history = lock(&self.history);
                    history.append_assistant(routine.clone());
                    tracing::debug!(
                        messages = history.len(),
                        last_role = ?history.last().role,
                        "routine committed"
                    );
                }
                self.surface
                    .show_message(ChatMessage::new(MessageKind::Routine, routine.clone()));
                TurnOutcome::Fulfilled(routine)
            }
            Err(e) => {
                tracing::error!(error = %e, "routine generation failed");
                self.notice(MessageKind::Error, prompts::ROUTINE_FAILED_MESSAGE);
                TurnOutcome::Failed
            }
        }
    }

    /// Forwards an on-topic follow-up question.
    ///
    /// The question and its answer are committed to the history together, so
    /// a failed request leaves the history untouched.
    pub async fn ask(&self, question: &str) -> TurnOutcome {
        let question = question.trim();
        if question.is_empty() {
            return TurnOutcome::Ignored;
        }

        let Some(_busy) = self.try_begin() else {
            self.notice(MessageKind::Notice, prompts::BUSY_MESSAGE);
            return TurnOutcome::Busy;
        };

        if !self.gate.is_on_topic(question) {
            tracing::debug!(question, "question rejected by topic gate");
            self.notice(MessageKind::Error, prompts::OFF_TOPIC_MESSAGE);
            return TurnOutcome::Rejected;
        }

        self.notice(MessageKind::User, question);

        let mut messages = self.history();
        messages.push(Message::user(question));
        let request = self.request(messages, self.question_params);

        tracing::info!(model = %request.model, "asking follow-up question");
        let loading = LoadingGuard::show(self.surface.as_ref(), prompts::QUESTION_LOADING);
        let result = self.provider.complete(&request).await;
        drop(loading);

        match result {
            Ok(answer) => {
                {
                    let mut history = lock(&self.history);
                    history.append_user(question);
                    history.append_assistant(answer.clone());
                    tracing::debug!(
                        messages = history.len(),
                        last_role = ?history.last().role,
                        "exchange committed"
                    );
                }
                self.surface
                    .show_message(ChatMessage::new(MessageKind::Advisor, answer.clone()));
                TurnOutcome::Fulfilled(answer)
            }
            Err(e) => {
                tracing::error!(error = %e, "question failed");
                self.notice(MessageKind::Error, prompts::QUESTION_FAILED_MESSAGE);
                TurnOutcome::Failed
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::catalog::sample_product;
    use crate::core::error::GlowError;
    use crate::providers::Role;
    use crate::topic::KeywordGate;
    use std::time::Duration;

    fn advisor_with(
        provider: impl LLMProvider + 'static,
        settings: AdvisorSettings,
    ) -> (Arc<Advisor>, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        let advisor = Advisor::new(
            settings,
            Box::new(provider),
            Box::new(KeywordGate::default()),
            surface.clone(),
        );
        (Arc::new(advisor), surface)
    }

    fn view() -> Vec<Product> {
        vec![sample_product("a", "cleanser"), sample_product("b", "cleanser")]
    }

    #[tokio::test]
    async fn routine_success_appends_one_assistant_entry() {
        let provider = ScriptedProvider::default().reply("Step 1: cleanse");
        let (advisor, surface) = advisor_with(provider.clone(), AdvisorSettings::default());
        advisor.toggle("a", &view());
        advisor.toggle("b", &view());
        let before = advisor.history();

        let outcome = advisor.generate_routine().await;

        assert_eq!(outcome, TurnOutcome::Fulfilled("Step 1: cleanse".to_string()));
        let after = advisor.history();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after.last().unwrap(), &Message::assistant("Step 1: cleanse"));
        assert_eq!(surface.messages_of(MessageKind::Routine), vec!["Step 1: cleanse"]);

        let request = &provider.requests()[0];
        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.messages[0].role, Role::System);
        let prompt = &request.messages.last().unwrap().content;
        assert!(prompt.find("Product a").unwrap() < prompt.find("Product b").unwrap());
    }

    #[tokio::test]
    async fn empty_selection_issues_no_request() {
        let provider = ScriptedProvider::default().reply("unused");
        let (advisor, surface) = advisor_with(provider.clone(), AdvisorSettings::default());

        let outcome = advisor.generate_routine().await;

        assert_eq!(outcome, TurnOutcome::EmptySelection);
        assert!(provider.requests().is_empty());
        assert_eq!(advisor.history().len(), 1);
        assert_eq!(
            surface.messages_of(MessageKind::Notice),
            vec![prompts::EMPTY_SELECTION_MESSAGE]
        );
        assert!(surface.loading_tokens().is_empty());
    }

    #[tokio::test]
    async fn off_topic_question_is_rejected_locally() {
        let provider = ScriptedProvider::default().reply("unused");
        let (advisor, surface) = advisor_with(provider.clone(), AdvisorSettings::default());

        let outcome = advisor.ask("What's the weather today?").await;

        assert_eq!(outcome, TurnOutcome::Rejected);
        assert!(provider.requests().is_empty());
        assert_eq!(advisor.history().len(), 1);
        assert_eq!(
            surface.messages_of(MessageKind::Error),
            vec![prompts::OFF_TOPIC_MESSAGE]
        );
        assert!(!advisor.is_busy());
    }

    #[tokio::test]
    async fn failed_question_renders_one_error_and_clears_loading_once() {
        let provider = ScriptedProvider::default().fail(GlowError::Network("reset".to_string()));
        let (advisor, surface) = advisor_with(provider, AdvisorSettings::default());

        let outcome = advisor.ask("How often should I exfoliate?").await;

        assert_eq!(outcome, TurnOutcome::Failed);
        assert!(!advisor.is_busy());
        assert_eq!(
            surface.messages_of(MessageKind::Error),
            vec![prompts::QUESTION_FAILED_MESSAGE]
        );
        let tokens = surface.loading_tokens();
        assert_eq!(tokens.len(), 1);
        assert_eq!(surface.cleared(tokens[0]), 1);
        assert_eq!(advisor.history().len(), 1);
    }

    #[tokio::test]
    async fn failed_routine_leaves_history_unchanged() {
        let provider = ScriptedProvider::default().fail(GlowError::Api("500".to_string()));
        let (advisor, surface) = advisor_with(provider, AdvisorSettings::default());
        advisor.toggle("a", &view());

        assert_eq!(advisor.generate_routine().await, TurnOutcome::Failed);
        assert_eq!(advisor.history().len(), 1);
        assert_eq!(
            surface.messages_of(MessageKind::Error),
            vec![prompts::ROUTINE_FAILED_MESSAGE]
        );
        let tokens = surface.loading_tokens();
        assert_eq!(surface.cleared(tokens[0]), 1);
    }

    #[tokio::test]
    async fn answered_question_commits_the_exchange() {
        let provider = ScriptedProvider::default()
            .reply("Step 1: cleanse")
            .reply("Apply sunscreen every morning.");
        let (advisor, surface) = advisor_with(provider.clone(), AdvisorSettings::default());
        advisor.toggle("a", &view());
        advisor.generate_routine().await;

        let outcome = advisor.ask("  When do I apply SPF?  ").await;

        assert_eq!(
            outcome,
            TurnOutcome::Fulfilled("Apply sunscreen every morning.".to_string())
        );
        let history = advisor.history();
        let tail: Vec<_> = history.iter().skip(1).cloned().collect();
        assert_eq!(
            tail,
            vec![
                Message::assistant("Step 1: cleanse"),
                Message::user("When do I apply SPF?"),
                Message::assistant("Apply sunscreen every morning."),
            ]
        );

        let second = &provider.requests()[1];
        assert_eq!(second.max_tokens, 300);
        assert_eq!(second.messages.len(), 3);
        assert_eq!(second.messages[1], Message::assistant("Step 1: cleanse"));

        assert_eq!(surface.messages_of(MessageKind::User), vec!["When do I apply SPF?"]);
        assert_eq!(
            surface.messages_of(MessageKind::Advisor),
            vec!["Apply sunscreen every morning."]
        );
    }

    #[tokio::test]
    async fn long_conversations_respect_the_history_limit() {
        let mut provider = ScriptedProvider::default();
        for i in 0..8 {
            provider = provider.reply(&format!("answer {}", i));
        }
        let settings = AdvisorSettings {
            history_limit: 5,
            ..Default::default()
        };
        let (advisor, _surface) = advisor_with(provider, settings);

        for i in 0..8 {
            advisor.ask(&format!("skin question {}", i)).await;
        }

        let history = advisor.history();
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].role, Role::System);
        assert_eq!(history[4], Message::assistant("answer 7"));
    }

    #[tokio::test]
    async fn blank_question_is_ignored() {
        let (advisor, surface) = advisor_with(ScriptedProvider::default(), AdvisorSettings::default());
        assert_eq!(advisor.ask("   ").await, TurnOutcome::Ignored);
        assert!(surface.events().is_empty());
    }

    #[tokio::test]
    async fn second_submission_while_pending_is_busy() {
        let provider = BlockingProvider::default();
        let (advisor, surface) = advisor_with(provider.clone(), AdvisorSettings::default());
        advisor.toggle("a", &view());

        let pending = {
            let advisor = advisor.clone();
            tokio::spawn(async move { advisor.ask("Which serum first?").await })
        };
        provider.started.notified().await;
        assert!(advisor.is_busy());

        assert_eq!(advisor.ask("And the cream?").await, TurnOutcome::Busy);
        assert_eq!(advisor.generate_routine().await, TurnOutcome::Busy);
        assert_eq!(surface.loading_tokens().len(), 1);

        provider.release.notify_one();
        let outcome = pending.await.unwrap();
        assert_eq!(outcome, TurnOutcome::Fulfilled("Use a gentle cleanser.".to_string()));
        assert!(!advisor.is_busy());
        assert_eq!(advisor.history().len(), 3);
        assert_eq!(surface.messages_of(MessageKind::Notice).len(), 2);
    }

    #[tokio::test]
    async fn cancelled_request_releases_busy_and_loading() {
        let provider = BlockingProvider::default();
        let (advisor, surface) = advisor_with(provider, AdvisorSettings::default());

        let result =
            tokio::time::timeout(Duration::from_millis(20), advisor.ask("Is my skin dry?")).await;

        assert!(result.is_err());
        assert!(!advisor.is_busy());
        let tokens = surface.loading_tokens();
        assert_eq!(tokens.len(), 1);
        assert_eq!(surface.cleared(tokens[0]), 1);
        assert_eq!(advisor.history().len(), 1);
    }

    #[test]
    fn selection_changes_are_forwarded_to_the_surface() {
        let (advisor, surface) = advisor_with(ScriptedProvider::default(), AdvisorSettings::default());

        advisor.toggle("a", &view());
        advisor.toggle("b", &view());
        advisor.remove("a");
        advisor.remove("a");
        advisor.toggle("zzz", &view());

        let selections: Vec<_> = surface
            .events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::Selection(ids) => Some(ids),
                _ => None,
            })
            .collect();
        assert_eq!(
            selections,
            vec![
                vec!["a".to_string()],
                vec!["a".to_string(), "b".to_string()],
                vec!["b".to_string()],
            ]
        );
        assert!(advisor.is_selected("b"));
    }

    #[test]
    fn model_can_be_switched() {
        let (advisor, _surface) = advisor_with(ScriptedProvider::default(), AdvisorSettings::default());
        advisor.set_model("gpt-4o-mini");
        assert_eq!(advisor.model(), "gpt-4o-mini");
        assert_eq!(advisor.provider_name(), "scripted");
    }
}

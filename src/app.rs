use crate::advisor::{Advisor, AdvisorSettings, TurnOutcome};
use crate::catalog::{CatalogSource, JsonFileCatalog};
use crate::cli::Args;
use crate::commands::{PendingAction, PickerState, dispatcher::CommandDispatcher};
use crate::config::{Config, Provider};
use crate::core::error::GlowError;
use crate::display::{self, TerminalSurface};
use crate::input;
use crate::providers::factory::ProviderFactory;
use crate::topic::KeywordGate;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Application {
    state: PickerState,
    command_dispatcher: CommandDispatcher,
}

/// CLI flag first, then the config's active provider, then OpenAI.
pub fn resolve_provider(args: &Args, config: &Config) -> Result<Provider, GlowError> {
    match args.provider.as_deref() {
        Some(name) => Provider::from_str(name)
            .ok_or_else(|| GlowError::Config(format!("Unsupported provider: {}", name))),
        None => Ok(config.active_provider.unwrap_or_default()),
    }
}

pub fn advisor_settings(args: &Args, config: &Config, provider: Provider) -> AdvisorSettings {
    let model = args
        .model
        .clone()
        .or_else(|| config.provider_config(provider).model)
        .unwrap_or_else(|| provider.default_model().to_string());

    AdvisorSettings {
        model,
        history_limit: config.history_limit,
        routine: config.routine,
        question: config.question,
    }
}

pub fn catalog_path(args: &Args, config: &Config) -> PathBuf {
    args.catalog
        .clone()
        .unwrap_or_else(|| config.catalog_path.clone())
}

pub fn topic_gate(config: &Config) -> KeywordGate {
    let gate = if config.topic_keywords.is_empty() {
        KeywordGate::default()
    } else {
        KeywordGate::new(&config.topic_keywords)
    };
    tracing::debug!(keywords = gate.keywords().len(), "topic gate ready");
    gate
}

impl Application {
    pub fn new(
        args: Args,
        config: Config,
        command_dispatcher: CommandDispatcher,
    ) -> Result<Self, GlowError> {
        let provider_kind = resolve_provider(&args, &config)?;
        let provider =
            ProviderFactory::new().create(&provider_kind, &config.provider_config(provider_kind))?;
        let settings = advisor_settings(&args, &config, provider_kind);
        tracing::info!(
            provider = provider_kind.as_str(),
            model = %settings.model,
            history_limit = settings.history_limit,
            "advisor configured"
        );

        let advisor = Advisor::new(
            settings,
            provider,
            Box::new(topic_gate(&config)),
            Arc::new(TerminalSurface::new()),
        );
        let catalog: Arc<dyn CatalogSource> =
            Arc::new(JsonFileCatalog::new(catalog_path(&args, &config)));

        Ok(Self {
            state: PickerState::new(Arc::new(advisor), catalog),
            command_dispatcher,
        })
    }

    pub async fn run(&mut self) -> Result<(), GlowError> {
        println!(
            "{}",
            style("✿ glowchat: your personal beauty advisor").bold().magenta()
        );
        println!(
            "{}",
            style("Type /help for commands, /categories to start browsing. Ctrl+D or /quit exits.")
                .dim()
        );
        println!("{}", display::render_products(None, |_| false));

        let mut editor = input::create_editor(self.command_dispatcher.clone())?;

        while self.state.should_continue {
            let input = match input::read_input(&mut editor)? {
                Some(line) => line.trim().to_string(),
                None => break,
            };

            if input.is_empty() {
                continue;
            }

            if input.starts_with('/') {
                self.handle_command(&input).await;
            } else {
                let outcome = self.state.advisor.ask(&input).await;
                tracing::debug!(?outcome, "question finished");
            }
        }

        Ok(())
    }

    async fn handle_command(&mut self, line: &str) {
        match self.command_dispatcher.execute_line(line, &mut self.state) {
            Ok(Some(output)) => println!("{}", output),
            Ok(None) => {}
            Err(e) => eprintln!("{} {}", style("✗").bold().red(), style(e).red()),
        }

        if let Some(action) = self.state.pending.take() {
            match action {
                PendingAction::GenerateRoutine => {
                    let outcome = self.state.advisor.generate_routine().await;
                    if let TurnOutcome::Fulfilled(_) = outcome {
                        println!(
                            "{}",
                            style("Ask me anything about your routine.").dim()
                        );
                    }
                }
            }
        }
    }
}

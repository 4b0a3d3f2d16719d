//! SheetMate REPL shell
//!
//! Headless front end over the assistant core: chats against the simulated
//! workbook, holds the pending batch, and applies or discards it on command.

mod settings;

use anyhow::Result;
use settings::TomlSettingsStore;
use sheetmate_core::{
    build_context, AIClient, ChatSession, HistoryStore, InMemoryHistoryStore, MessageRole,
    ProviderKind, SettingsStore, SheetMateError, SimulatedWorkbook,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const HELP: &str = "Commands:
  :key <api-key>       store the API key for the current provider
  :clearkey            remove the stored API key
  :provider <tag>      switch backend (openai | gemini | deepseek)
  :model <name>        override the model name
  :settings            show current settings
  :context             print the workbook context block
  :apply               apply the pending operation batch
  :discard             discard the pending operation batch
  :history             print the conversation so far
  :clear               clear conversation history
  :help                this message
  :quit                exit
Anything else is sent to the assistant as a chat message.";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings: Arc<dyn SettingsStore> = Arc::new(TomlSettingsStore::new()?);
    let workbook = Arc::new(SimulatedWorkbook::new());
    let history = Arc::new(InMemoryHistoryStore::new());
    let mut session = ChatSession::new(
        AIClient::new(),
        workbook.clone(),
        settings.clone(),
        history.clone(),
    );

    println!("SheetMate {} — type :help for commands", sheetmate_core::VERSION);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').map_or((line, ""), |(a, b)| (a, b.trim())) {
            (":quit", _) | (":q", _) => break,
            (":help", _) => println!("{}", HELP),
            (":key", key) if !key.is_empty() => {
                settings.save_api_key(key)?;
                println!("API key stored.");
            }
            (":clearkey", _) => {
                settings.clear_api_key()?;
                println!("API key cleared.");
            }
            (":provider", tag) => match tag.parse::<ProviderKind>() {
                Ok(provider) => {
                    settings.save_provider(provider)?;
                    println!(
                        "Provider set to {} (model {}).",
                        provider.display_name(),
                        provider.default_model()
                    );
                }
                Err(error) => println!("{}", error),
            },
            (":model", model) if !model.is_empty() => {
                settings.save_model(model)?;
                println!("Model set to {}.", model);
            }
            (":settings", _) => {
                let current = settings.get_settings()?;
                println!(
                    "provider={} model={} key={}",
                    current.provider,
                    current.model,
                    if current.api_key.is_empty() { "<unset>" } else { "<set>" }
                );
            }
            (":context", _) => println!("{}", build_context(workbook.as_ref()).await),
            (":apply", _) => {
                let report = session.apply_pending().await?;
                if report.attempted == 0 {
                    println!("No pending operations.");
                } else {
                    println!("Applied {}/{} operations.", report.applied, report.attempted);
                    for (action, error) in &report.errors {
                        println!("  {} failed: {}", action, error);
                    }
                }
            }
            (":discard", _) => {
                session.discard_pending();
                println!("Pending operations discarded.");
            }
            (":history", _) => {
                let messages = history.get_messages()?;
                if messages.is_empty() {
                    println!("No history yet.");
                }
                for message in &messages {
                    let speaker = match message.role {
                        MessageRole::System => "system",
                        MessageRole::User => "you",
                        MessageRole::Assistant => "assistant",
                    };
                    println!("[{}] {}", speaker, message.content);
                }
            }
            (":clear", _) => {
                session.clear_history()?;
                println!("History cleared.");
            }
            _ => match session.chat(line).await {
                Ok(response) => {
                    println!("{}", response.text);
                    if !response.operations.is_empty() {
                        println!(
                            "\nProposed {} operation(s): {}",
                            response.operations.len(),
                            response
                                .operations
                                .iter()
                                .map(|op| op.action())
                                .collect::<Vec<_>>()
                                .join(", ")
                        );
                        println!("Use :apply to run them or :discard to drop them.");
                    }
                }
                Err(SheetMateError::MissingCredential(provider)) => {
                    println!(
                        "No API key configured for '{}'. Set one with :key <api-key>.",
                        provider
                    );
                }
                Err(error) => println!("Turn failed: {}", error),
            },
        }
    }

    Ok(())
}

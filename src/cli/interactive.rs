//! Interactive translation loop over a line-based input

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::core::client::Translator;
use crate::core::errors::Result;
use crate::core::models::{TranslationRequest, AUTO_SOURCE};
use crate::core::usage_log::UsageLog;

const LANG_COMMAND: &str = "/lang";

/// Current language pair of an interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub source_lang: String,
    pub target_lang: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            source_lang: AUTO_SOURCE.to_string(),
            target_lang: "English".to_string(),
        }
    }
}

/// What a line of input asks the session to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Exit,
    SetLanguages { source: String, target: String },
    LangUsage,
    Blank,
    Translate(String),
}

/// Classify one line of user input
pub fn parse_command(line: &str) -> SessionCommand {
    let trimmed = line.trim();
    let lowered = trimmed.to_lowercase();

    if lowered == "exit" || lowered == "quit" {
        return SessionCommand::Exit;
    }

    if lowered == LANG_COMMAND {
        return SessionCommand::LangUsage;
    }

    if lowered.starts_with("/lang ") {
        // "/lang " is ASCII, so the byte offset is the same in the original line
        let rest = &trimmed[LANG_COMMAND.len() + 1..];
        let parts: Vec<&str> = rest.split(" to ").collect();

        return match parts.as_slice() {
            [source, target] if !target.trim().is_empty() => {
                let source = source.trim();
                SessionCommand::SetLanguages {
                    source: if source.is_empty() {
                        AUTO_SOURCE.to_string()
                    } else {
                        source.to_string()
                    },
                    target: target.trim().to_string(),
                }
            }
            _ => SessionCommand::LangUsage,
        };
    }

    if trimmed.is_empty() {
        return SessionCommand::Blank;
    }

    SessionCommand::Translate(line.to_string())
}

/// Read-eval loop delegating to a translator and recording usage
pub struct InteractiveSession {
    translator: Translator,
    usage_log: UsageLog,
}

impl InteractiveSession {
    pub fn new(translator: Translator, usage_log: UsageLog) -> Self {
        Self {
            translator,
            usage_log,
        }
    }

    /// Run until `exit`/`quit` or end of input, returning the final state
    pub async fn run<R, W>(&self, reader: R, out: &mut W) -> Result<SessionState>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut state = SessionState::default();
        let mut lines = reader.lines();

        writeln!(out, "🌍 Translator powered by {}", self.translator.model())?;
        writeln!(out, "Type 'exit' or 'quit' to stop\n")?;

        loop {
            write!(
                out,
                "[{} → {}] Enter text to translate: ",
                state.source_lang, state.target_lang
            )?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                debug!("End of input, leaving interactive session");
                writeln!(out)?;
                break;
            };

            if !self.handle_line(&mut state, &line, out).await? {
                break;
            }
        }

        Ok(state)
    }

    /// Process a single line. Returns `false` once the session should stop.
    pub async fn handle_line<W: Write>(
        &self,
        state: &mut SessionState,
        line: &str,
        out: &mut W,
    ) -> Result<bool> {
        match parse_command(line) {
            SessionCommand::Exit => {
                writeln!(out, "Goodbye! 👋")?;
                return Ok(false);
            }
            SessionCommand::SetLanguages { source, target } => {
                info!("Language pair updated: {} -> {}", source, target);
                state.source_lang = source;
                state.target_lang = target;
                writeln!(
                    out,
                    "Language pair updated: {} → {}\n",
                    state.source_lang, state.target_lang
                )?;
            }
            SessionCommand::LangUsage => {
                writeln!(
                    out,
                    "Usage: /lang <source> to <target> (e.g., /lang English to Spanish)"
                )?;
                writeln!(out, "Or: /lang auto to <target> for auto-detect\n")?;
            }
            SessionCommand::Blank => {}
            SessionCommand::Translate(text) => {
                self.translate_line(state, text, out).await?;
            }
        }

        Ok(true)
    }

    async fn translate_line<W: Write>(
        &self,
        state: &SessionState,
        text: String,
        out: &mut W,
    ) -> Result<()> {
        write!(out, "Translating... ")?;
        out.flush()?;

        let request = TranslationRequest::new(text, state.target_lang.as_str())
            .with_source_lang(state.source_lang.as_str());

        match self.translator.translate(&request, true).await {
            Ok(result) => {
                writeln!(out, "\n✓ Translation: {}", result.translated_text)?;
                if let Some(usage) = result.usage {
                    writeln!(
                        out,
                        "  Tokens: Input={}, Output={}",
                        usage.input, usage.output
                    )?;
                    self.usage_log.append(usage.input, usage.output).await;
                }
                writeln!(out)?;
            }
            Err(e) => {
                writeln!(out, "\n✗ Error: {}\n", e)?;
            }
        }

        Ok(())
    }
}

//! Shell interpreter input/output contracts shared by the headless shell and the terminal UI.
//!
//! A command never mutates anything by itself. It returns a [`CommandOutcome`] carrying printed
//! lines plus [`ShellEffect`] intents, and the owning session applies those intents in order.
//! Nothing here depends on Leptos or browser APIs.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{cell::Cell, rc::Rc};

use platform_host::RootFolder;
use serde::{Deserialize, Serialize};

/// Foreground colour of a fresh terminal.
pub const DEFAULT_TEXT_COLOR: &str = "#cccccc";
/// Delay between the `logoff` message and the actual session end.
pub const DEFAULT_LOGOFF_DELAY_MS: u64 = 800;

/// Entry of the pending-line queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "kebab-case")]
pub enum PendingLine {
    /// Line executed through the interpreter and echoed behind the prompt.
    Command(String),
    /// Line printed verbatim when its turn comes.
    Output(String),
}

impl PendingLine {
    /// Wraps script text lines as commands.
    pub fn commands<I, S>(lines: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lines.into_iter().map(|line| Self::Command(line.into())).collect()
    }
}

/// Application launch requested from the shell.
///
/// `app` is the raw token; the desktop host validates it and ignores unknown ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRequest {
    /// Requested application id token.
    pub app: String,
    /// URL payload for the browser.
    pub url: Option<String>,
}

impl LaunchRequest {
    /// Launch without payload.
    pub fn app(app: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            url: None,
        }
    }

    /// Browser launch pointed at `url`.
    pub fn browser(url: impl Into<String>) -> Self {
        Self {
            app: "browser".to_string(),
            url: Some(url.into()),
        }
    }
}

/// Side-effect intent produced by a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "kebab-case")]
pub enum ShellEffect {
    /// Switch the working directory.
    ChangeDirectory {
        /// New working directory.
        root: RootFolder,
    },
    /// Drop the whole transcript.
    ClearTranscript,
    /// Change the foreground colour (CSS colour string).
    SetTextColor {
        /// Colour value.
        color: String,
    },
    /// Create a folder in the working directory.
    CreateFolder {
        /// Folder name.
        name: String,
    },
    /// Put lines at the front of the pending queue, preserving their order.
    EnqueueFront {
        /// Lines to run next.
        lines: Vec<PendingLine>,
    },
    /// Ask the desktop to open an application.
    OpenApp {
        /// Launch target.
        request: LaunchRequest,
    },
    /// Close the hosting terminal window.
    CloseWindow,
    /// End the desktop session after a delay.
    ScheduleLogOff {
        /// Delay before log-off.
        delay_ms: u64,
    },
}

/// Result of interpreting one line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Printed lines, in order.
    pub output: Vec<String>,
    /// Whether line consumption must stop until an external keypress.
    pub halts_for_keypress: bool,
    /// Intents for the session to apply after printing.
    pub effects: Vec<ShellEffect>,
}

impl CommandOutcome {
    /// Outcome that prints nothing and does nothing.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Outcome printing `lines`.
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Outcome printing a single line.
    pub fn line(line: impl Into<String>) -> Self {
        Self::lines([line.into()])
    }

    /// Adds an effect.
    pub fn with_effect(mut self, effect: ShellEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Marks the outcome as halting for a keypress.
    pub fn halting(mut self) -> Self {
        self.halts_for_keypress = true;
        self
    }
}

/// Shared cancellation flag tied to a terminal window's lifetime.
///
/// Clones observe the same flag. Once cancelled a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    /// Creates a live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the token and every clone of it.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Returns `true` once [`Self::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl PartialEq for CancellationToken {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cancelling_a_clone_cancels_the_original() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token, clone);
        assert!(token != CancellationToken::new());
    }

    #[test]
    fn effects_serialize_with_kebab_case_tags() {
        let effect = ShellEffect::ScheduleLogOff { delay_ms: 800 };
        let json = serde_json::to_value(&effect).expect("serialize effect");
        assert_eq!(
            json,
            serde_json::json!({ "effect": "schedule-log-off", "delay_ms": 800 })
        );

        let line = serde_json::to_value(PendingLine::Output("Reply".to_string()))
            .expect("serialize line");
        assert_eq!(
            line,
            serde_json::json!({ "kind": "output", "text": "Reply" })
        );
    }

    #[test]
    fn outcome_builders_compose() {
        let outcome = CommandOutcome::line("Logging off...")
            .with_effect(ShellEffect::ScheduleLogOff {
                delay_ms: DEFAULT_LOGOFF_DELAY_MS,
            })
            .halting();
        assert_eq!(outcome.output, vec!["Logging off...".to_string()]);
        assert!(outcome.halts_for_keypress);
        assert_eq!(outcome.effects.len(), 1);
    }
}

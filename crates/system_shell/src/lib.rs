//! Headless command-prompt engine for the simulated terminal.
//!
//! [`interpreter::execute`] evaluates one line against a read-only context, [`runner::ScriptRunner`]
//! holds the pending-line queue, [`session::ShellSession`] applies command effects to terminal
//! state, and [`task::ScriptTask`] paces queued lines in the background.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod builtins;
pub mod interpreter;
pub mod runner;
pub mod session;
pub mod task;

pub use builtins::{help_lines, Builtin};
pub use interpreter::{
    color_for_digit, directory_path, execute, start_target, CommandContext, DEFAULT_PING_HOST,
    HOST_NAME, PAUSE_PROMPT, VERSION_LINE,
};
pub use runner::{RunnerState, ScriptRunner};
pub use session::{
    drive, HostRequest, SessionView, ShellEnvironment, ShellHost, ShellSession, StepOutcome,
    MAX_TRANSCRIPT_LINES, TERMINAL_BANNER,
};
pub use task::{
    script_channel, spawn_script_task, PacingTimer, ScriptSignal, ScriptSignals, ScriptTask,
    TaskExit, TimeoutPacingTimer, DEFAULT_PACING,
};

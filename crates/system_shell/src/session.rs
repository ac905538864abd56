//! Terminal session state: working directory, transcript, colour, and the script runner.
//!
//! Session methods never call back into the host. Requests for the outside world queue up as
//! [`HostRequest`] values that [`drive`] hands to a [`ShellHost`] once the session borrow is
//! released.

use std::{cell::RefCell, time::Duration};

use chrono::NaiveDateTime;
use platform_host::{ParentFolder, RootFolder, VirtualFile, VirtualFileStore};
use system_shell_contract::{
    LaunchRequest, PendingLine, ShellEffect, DEFAULT_LOGOFF_DELAY_MS, DEFAULT_TEXT_COLOR,
};

use crate::{
    interpreter::{directory_path, execute, CommandContext},
    runner::{RunnerState, ScriptRunner},
};

/// Banner printed when a terminal opens.
pub const TERMINAL_BANNER: [&str; 3] = [
    "Windows Terminal [Version 10.0.22621.1]",
    "(c) Microsoft Corporation. All rights reserved.",
    "",
];
/// Oldest lines are dropped beyond this transcript length.
pub const MAX_TRANSCRIPT_LINES: usize = 1000;

/// Inputs read at the moment a line runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellEnvironment {
    /// Snapshot of the shared file store.
    pub files: VirtualFileStore,
    /// Wall clock.
    pub now: NaiveDateTime,
}

/// Outside-world action requested by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    /// Create a folder.
    CreateFolder {
        /// Containing folder.
        parent: ParentFolder,
        /// Folder name.
        name: String,
    },
    /// Open an application.
    OpenApp(LaunchRequest),
    /// Close the terminal window.
    CloseWindow,
    /// End the desktop session after a delay.
    LogOff(Duration),
}

/// Result of a session step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing to do.
    Idle,
    /// A line ran or printed; more may follow.
    Progressed,
    /// The runner is waiting for a keypress.
    Paused,
    /// The window was asked to close; the session is finished.
    Closed,
}

/// Render-ready copy of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// Transcript lines.
    pub transcript: Vec<String>,
    /// Prompt for the input row.
    pub prompt: String,
    /// Foreground colour.
    pub text_color: String,
    /// Whether input is suspended by `pause`.
    pub paused: bool,
    /// Whether queued lines are still running.
    pub busy: bool,
}

/// One terminal's interpreter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSession {
    user_name: String,
    cwd: ParentFolder,
    root: RootFolder,
    transcript: Vec<String>,
    text_color: String,
    runner: ScriptRunner,
    logoff_delay_ms: u64,
    closed: bool,
    outbox: Vec<HostRequest>,
}

impl ShellSession {
    /// Opens a session in Documents with the banner printed.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            cwd: ParentFolder::Root(RootFolder::Documents),
            root: RootFolder::Documents,
            transcript: TERMINAL_BANNER.iter().map(|line| line.to_string()).collect(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            runner: ScriptRunner::default(),
            logoff_delay_ms: DEFAULT_LOGOFF_DELAY_MS,
            closed: false,
            outbox: Vec::new(),
        }
    }

    /// Overrides the delay attached to `logoff`.
    pub fn with_logoff_delay(mut self, delay: Duration) -> Self {
        self.logoff_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Prompt text, e.g. `C:\Users\alice\Documents>`.
    pub fn prompt(&self) -> String {
        format!("{}>", directory_path(&self.user_name, self.root))
    }

    /// Working directory.
    pub fn cwd(&self) -> &ParentFolder {
        &self.cwd
    }

    /// Root the working directory sits under.
    pub fn root(&self) -> RootFolder {
        self.root
    }

    /// Transcript lines.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Foreground colour.
    pub fn text_color(&self) -> &str {
        &self.text_color
    }

    /// Runner phase.
    pub fn runner_state(&self) -> RunnerState {
        self.runner.state()
    }

    /// Returns `true` once the session asked for its window to close.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Render-ready copy.
    pub fn view(&self) -> SessionView {
        SessionView {
            transcript: self.transcript.clone(),
            prompt: self.prompt(),
            text_color: self.text_color.clone(),
            paused: self.runner.is_paused(),
            busy: self.runner.state() == RunnerState::Running,
        }
    }

    /// Removes queued host requests.
    pub fn take_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Runs a line typed at the prompt.
    ///
    /// The echo, the output, and a trailing blank line are appended. Input is ignored while paused
    /// or after the session closed.
    pub fn submit(&mut self, line: &str, env: &ShellEnvironment) -> StepOutcome {
        if self.closed {
            return StepOutcome::Closed;
        }
        if self.runner.is_paused() {
            return StepOutcome::Paused;
        }
        self.run_line(line, env, true);
        self.settle()
    }

    /// Starts a batch file opened directly: prints the launch header, moves to the script's folder,
    /// and queues its lines as an auto-closing run.
    pub fn launch_script(&mut self, script: &VirtualFile, env: &ShellEnvironment) {
        self.transcript
            .push(format!("Executing batch script: {}", script.file_name()));
        self.transcript.push("---".to_string());
        if let Some(root) = env.files.root_of(&script.parent) {
            self.cwd = script.parent.clone();
            self.root = root;
        }
        self.runner
            .load(PendingLine::commands(script.lines()), true);
    }

    /// Consumes one queued line.
    pub fn tick(&mut self, env: &ShellEnvironment) -> StepOutcome {
        if self.closed {
            return StepOutcome::Closed;
        }
        let Some(line) = self.runner.next_line() else {
            return if self.runner.is_paused() {
                StepOutcome::Paused
            } else {
                StepOutcome::Idle
            };
        };

        match line {
            PendingLine::Command(text) => self.run_line(&text, env, false),
            PendingLine::Output(text) => {
                self.transcript.push(text);
                self.trim_transcript();
            }
        }
        self.settle()
    }

    /// Delivers the external keypress that ends a pause.
    pub fn resume(&mut self) -> StepOutcome {
        if self.closed {
            return StepOutcome::Closed;
        }
        if !self.runner.resume() {
            return StepOutcome::Idle;
        }
        self.transcript.push(String::new());
        self.settle()
    }

    /// Stops any queued run.
    pub fn abort_script(&mut self) {
        self.runner.clear();
    }

    fn run_line(&mut self, line: &str, env: &ShellEnvironment, interactive: bool) {
        let ctx = CommandContext {
            user_name: &self.user_name,
            cwd: &self.cwd,
            root: self.root,
            files: &env.files,
            now: env.now,
            logoff_delay_ms: self.logoff_delay_ms,
        };
        let outcome = execute(line, &ctx);

        self.transcript.push(format!("{}{line}", self.prompt()));
        self.transcript.extend(outcome.output);
        if interactive {
            self.transcript.push(String::new());
        }
        for effect in outcome.effects {
            self.apply(effect);
        }
        if outcome.halts_for_keypress {
            self.runner.pause();
        }
        self.trim_transcript();
    }

    fn apply(&mut self, effect: ShellEffect) {
        match effect {
            ShellEffect::ChangeDirectory { root } => {
                self.cwd = ParentFolder::Root(root);
                self.root = root;
            }
            ShellEffect::ClearTranscript => self.transcript.clear(),
            ShellEffect::SetTextColor { color } => self.text_color = color,
            ShellEffect::CreateFolder { name } => self.outbox.push(HostRequest::CreateFolder {
                parent: self.cwd.clone(),
                name,
            }),
            ShellEffect::EnqueueFront { lines } => self.runner.enqueue_front(lines),
            ShellEffect::OpenApp { request } => self.outbox.push(HostRequest::OpenApp(request)),
            ShellEffect::CloseWindow => self.close(),
            ShellEffect::ScheduleLogOff { delay_ms } => self
                .outbox
                .push(HostRequest::LogOff(Duration::from_millis(delay_ms))),
        }
    }

    fn settle(&mut self) -> StepOutcome {
        if self.closed {
            return StepOutcome::Closed;
        }
        if self.runner.is_paused() {
            return StepOutcome::Paused;
        }
        if self.runner.is_empty() && self.runner.auto_close() {
            self.close();
            return StepOutcome::Closed;
        }
        StepOutcome::Progressed
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.runner.clear();
            self.outbox.push(HostRequest::CloseWindow);
        }
    }

    fn trim_transcript(&mut self) {
        if self.transcript.len() > MAX_TRANSCRIPT_LINES {
            let overflow = self.transcript.len() - MAX_TRANSCRIPT_LINES;
            self.transcript.drain(0..overflow);
        }
    }
}

/// Desktop services a terminal session talks to.
pub trait ShellHost {
    /// Current snapshot of the shared file store.
    fn files(&self) -> VirtualFileStore;

    /// Wall clock.
    fn now(&self) -> NaiveDateTime;

    /// Carries out a queued request.
    fn perform(&self, request: HostRequest);

    /// Receives the session state after each step.
    fn render(&self, _view: SessionView) {}

    /// Builds the environment for the next step.
    fn environment(&self) -> ShellEnvironment {
        ShellEnvironment {
            files: self.files(),
            now: self.now(),
        }
    }
}

/// Runs `step` against the session, then renders and flushes host requests with the borrow
/// released.
pub fn drive<H, F>(session: &RefCell<ShellSession>, host: &H, step: F) -> StepOutcome
where
    H: ShellHost + ?Sized,
    F: FnOnce(&mut ShellSession, &ShellEnvironment) -> StepOutcome,
{
    let env = host.environment();
    let (outcome, view, requests) = {
        let mut session = session.borrow_mut();
        let outcome = step(&mut session, &env);
        (outcome, session.view(), session.take_requests())
    };
    host.render(view);
    for request in requests {
        host.perform(request);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use platform_host::FileDraft;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::PAUSE_PROMPT;

    fn env_with(files: VirtualFileStore) -> ShellEnvironment {
        ShellEnvironment {
            files,
            now: NaiveDate::from_ymd_opt(2024, 5, 23)
                .and_then(|date| date.and_hms_opt(9, 0, 0))
                .expect("valid timestamp"),
        }
    }

    fn drain(session: &mut ShellSession, env: &ShellEnvironment) -> StepOutcome {
        loop {
            match session.tick(env) {
                StepOutcome::Progressed => continue,
                other => return other,
            }
        }
    }

    fn echoed(session: &ShellSession) -> Vec<String> {
        session
            .transcript()
            .iter()
            .filter(|line| !line.contains('>') && !line.is_empty())
            .cloned()
            .collect()
    }

    #[test]
    fn interactive_submit_echoes_prompt_output_and_blank_line() {
        let mut session = ShellSession::new("Alice");
        let env = env_with(VirtualFileStore::seeded());

        assert_eq!(session.submit("whoami", &env), StepOutcome::Progressed);
        assert_eq!(
            &session.transcript()[3..],
            &[
                "C:\\Users\\Alice\\Documents>whoami".to_string(),
                "win-sim\\alice".to_string(),
                String::new(),
            ]
        );
    }

    #[test]
    fn cd_changes_the_prompt_for_following_lines() {
        let mut session = ShellSession::new("Alice");
        let env = env_with(VirtualFileStore::seeded());
        session.submit("cd downloads", &env);

        assert_eq!(session.cwd(), &ParentFolder::Root(RootFolder::Downloads));
        assert_eq!(session.prompt(), "C:\\Users\\Alice\\Downloads>");
        assert_eq!(
            session.transcript()[3],
            "C:\\Users\\Alice\\Documents>cd downloads"
        );
    }

    #[test]
    fn cls_clears_everything_including_its_echo() {
        let mut session = ShellSession::new("Alice");
        let env = env_with(VirtualFileStore::seeded());
        session.submit("ver", &env);
        session.submit("cls", &env);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn nested_batch_runs_inline_at_the_point_of_invocation() {
        let mut files = VirtualFileStore::new();
        files.save(FileDraft::text("inner", "bat", RootFolder::Desktop, "echo mid"));
        let outer = files.save(FileDraft::text(
            "outer",
            "bat",
            RootFolder::Desktop,
            "@echo off\necho start\ninner.bat\necho end",
        ));
        let env = env_with(files);

        let mut session = ShellSession::new("Alice");
        session.launch_script(&outer, &env);
        assert_eq!(session.cwd(), &ParentFolder::Root(RootFolder::Desktop));
        assert_eq!(drain(&mut session, &env), StepOutcome::Closed);

        assert_eq!(
            echoed(&session),
            vec![
                "Windows Terminal [Version 10.0.22621.1]".to_string(),
                "(c) Microsoft Corporation. All rights reserved.".to_string(),
                "Executing batch script: outer.bat".to_string(),
                "---".to_string(),
                "start".to_string(),
                "Starting nested batch execution for inner...".to_string(),
                "mid".to_string(),
                "end".to_string(),
            ]
        );
        assert_eq!(session.take_requests(), vec![HostRequest::CloseWindow]);
    }

    #[test]
    fn script_in_a_sub_folder_finds_its_siblings() {
        let mut files = VirtualFileStore::new();
        let folder = files
            .create_folder("Scripts", ParentFolder::Root(RootFolder::Desktop))
            .expect("folder");
        let scripts = ParentFolder::Folder(folder.id.clone());
        files.save(FileDraft::text("inner", "bat", scripts.clone(), "echo mid"));
        files.save(FileDraft::text("notes", "txt", scripts.clone(), "first\nsecond"));
        let outer = files.save(FileDraft::text(
            "outer",
            "bat",
            scripts.clone(),
            "echo start\ninner.bat\ntype notes\necho end",
        ));
        let env = env_with(files);

        let mut session = ShellSession::new("Alice");
        session.launch_script(&outer, &env);
        assert_eq!(session.cwd(), &scripts);
        assert_eq!(session.prompt(), "C:\\Users\\Alice\\Desktop>");
        assert_eq!(drain(&mut session, &env), StepOutcome::Closed);

        assert_eq!(
            echoed(&session)[4..].to_vec(),
            vec![
                "start".to_string(),
                "Starting nested batch execution for inner...".to_string(),
                "mid".to_string(),
                "first".to_string(),
                "second".to_string(),
                "end".to_string(),
            ]
        );
    }

    #[test]
    fn cd_from_a_sub_folder_returns_to_a_root() {
        let mut files = VirtualFileStore::new();
        let folder = files
            .create_folder("Scripts", ParentFolder::Root(RootFolder::Desktop))
            .expect("folder");
        let script = files.save(FileDraft::text(
            "go",
            "bat",
            ParentFolder::Folder(folder.id.clone()),
            "cd downloads\nmkdir Fresh",
        ));
        let env = env_with(files);

        let mut session = ShellSession::new("Alice");
        session.launch_script(&script, &env);
        drain(&mut session, &env);

        assert_eq!(session.cwd(), &ParentFolder::Root(RootFolder::Downloads));
        assert_eq!(session.root(), RootFolder::Downloads);
        assert_eq!(
            session.take_requests(),
            vec![
                HostRequest::CreateFolder {
                    parent: ParentFolder::Root(RootFolder::Downloads),
                    name: "Fresh".to_string(),
                },
                HostRequest::CloseWindow,
            ]
        );
    }

    #[test]
    fn pause_holds_the_queue_until_resume() {
        let mut files = VirtualFileStore::new();
        let script = files.save(FileDraft::text(
            "hold",
            "bat",
            RootFolder::Documents,
            "echo before\npause\necho after",
        ));
        let env = env_with(files);
        let mut session = ShellSession::new("Alice");
        session.launch_script(&script, &env);

        assert_eq!(drain(&mut session, &env), StepOutcome::Paused);
        assert_eq!(session.transcript().last(), Some(&PAUSE_PROMPT.to_string()));
        assert_eq!(session.tick(&env), StepOutcome::Paused);
        assert_eq!(session.submit("echo typed", &env), StepOutcome::Paused);

        assert_eq!(session.resume(), StepOutcome::Progressed);
        assert_eq!(session.transcript().last(), Some(&String::new()));
        assert_eq!(session.tick(&env), StepOutcome::Closed);
        assert_eq!(
            &session.transcript()[session.transcript().len() - 2..],
            &[
                "C:\\Users\\Alice\\Documents>echo after".to_string(),
                "after".to_string(),
            ]
        );
    }

    #[test]
    fn resume_closes_an_auto_run_that_ended_on_pause() {
        let mut files = VirtualFileStore::new();
        let script = files.save(FileDraft::text("end", "bat", RootFolder::Documents, "pause"));
        let env = env_with(files);
        let mut session = ShellSession::new("Alice");
        session.launch_script(&script, &env);

        assert_eq!(session.tick(&env), StepOutcome::Paused);
        assert_eq!(session.resume(), StepOutcome::Closed);
        assert_eq!(session.take_requests(), vec![HostRequest::CloseWindow]);
    }

    #[test]
    fn interactive_ping_queues_output_without_closing() {
        let mut session = ShellSession::new("Alice");
        let env = env_with(VirtualFileStore::new());
        session.submit("ping", &env);

        assert_eq!(session.runner_state(), RunnerState::Running);
        assert_eq!(drain(&mut session, &env), StepOutcome::Idle);
        assert!(!session.is_closed());
        assert_eq!(
            session.transcript().last(),
            Some(&"    Packets: Sent = 4, Received = 4, Lost = 0 (0% loss),".to_string())
        );
    }

    #[test]
    fn effects_become_host_requests() {
        let mut session = ShellSession::new("Alice").with_logoff_delay(Duration::from_millis(250));
        let env = env_with(VirtualFileStore::new());
        session.submit("cd desktop", &env);
        session.submit("mkdir Stuff", &env);
        session.submit("start notepad", &env);
        session.submit("color c", &env);
        session.submit("logoff", &env);

        assert_eq!(session.text_color(), "#e74856");
        assert_eq!(
            session.take_requests(),
            vec![
                HostRequest::CreateFolder {
                    parent: ParentFolder::Root(RootFolder::Desktop),
                    name: "Stuff".to_string(),
                },
                HostRequest::OpenApp(LaunchRequest::app("notepad")),
                HostRequest::LogOff(Duration::from_millis(250)),
            ]
        );
        assert_eq!(session.submit("exit", &env), StepOutcome::Closed);
        assert_eq!(session.take_requests(), vec![HostRequest::CloseWindow]);
        assert_eq!(session.submit("ver", &env), StepOutcome::Closed);
    }

    #[test]
    fn transcript_is_capped() {
        let mut session = ShellSession::new("Alice");
        let env = env_with(VirtualFileStore::new());
        for _ in 0..(MAX_TRANSCRIPT_LINES / 2) {
            session.submit("echo x", &env);
        }
        assert_eq!(session.transcript().len(), MAX_TRANSCRIPT_LINES);
    }
}

//! Terminal window backed by a headless [`ShellSession`].
//!
//! Typed lines run immediately. Queued lines (batch scripts, `ping` replies) are fed by a
//! [`system_shell::ScriptTask`] bound to the window's lifetime token. While a script is paused,
//! window-level keydown and mousedown listeners resume it; they are attached only for the pause.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod bridge;

use std::{cell::RefCell, rc::Rc};

use desktop_app_contract::{AppMountContext, AppPayload};
use leptos::ev::{KeyboardEvent, MouseEvent};
use leptos::*;
use platform_host::FileKind;
use system_shell::{
    drive, script_channel, spawn_script_task, ScriptSignals, ScriptTask, ShellSession,
    StepOutcome,
};

pub use bridge::{launch_target, TerminalBridge};

/// Mounts a Terminal window.
pub fn mount_terminal(context: AppMountContext) -> View {
    view! { <TerminalApp context=context /> }.into_view()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Direction of an arrow-key history step.
pub enum HistoryStep {
    /// Arrow up.
    Older,
    /// Arrow down.
    Newer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Lines typed at the prompt, newest last.
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl CommandHistory {
    /// Records a submitted line and resets navigation.
    pub fn push(&mut self, line: &str) {
        let line = line.trim();
        if !line.is_empty() {
            self.entries.push(line.to_string());
        }
        self.cursor = None;
    }

    /// Moves through history and returns the text for the input row.
    ///
    /// Stepping newer past the last entry clears the input. Returns `None` when history is empty.
    pub fn step(&mut self, step: HistoryStep) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = match (self.cursor, step) {
            (None, HistoryStep::Older) => Some(self.entries.len() - 1),
            (Some(index), HistoryStep::Older) if index > 0 => Some(index - 1),
            (Some(index), HistoryStep::Newer) if index + 1 < self.entries.len() => Some(index + 1),
            (Some(_), HistoryStep::Newer) => None,
            (current, _) => current,
        };
        Some(
            self.cursor
                .map(|index| self.entries[index].clone())
                .unwrap_or_default(),
        )
    }
}

#[derive(Debug)]
/// Listener handles held for the duration of a `pause`.
pub struct ResumeListeners<H> {
    handles: Vec<H>,
}

impl<H> Default for ResumeListeners<H> {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
        }
    }
}

impl<H> ResumeListeners<H> {
    /// Follows the paused flag.
    ///
    /// Calls `attach` when a pause begins and keeps its handles. When the pause ends the held
    /// handles are returned for removal. Repeated calls with the same flag do nothing.
    pub fn sync(&mut self, paused: bool, attach: impl FnOnce() -> Vec<H>) -> Vec<H> {
        match (paused, self.handles.is_empty()) {
            (true, true) => {
                self.handles = attach();
                Vec::new()
            }
            (false, false) => std::mem::take(&mut self.handles),
            _ => Vec::new(),
        }
    }

    /// Returns `true` while listeners are attached.
    pub fn is_listening(&self) -> bool {
        !self.handles.is_empty()
    }

    /// Hands back every held handle, e.g. on teardown.
    pub fn take(&mut self) -> Vec<H> {
        std::mem::take(&mut self.handles)
    }
}

struct TerminalHandle {
    session: Rc<RefCell<ShellSession>>,
    bridge: Rc<TerminalBridge>,
    signals: ScriptSignals,
}

impl TerminalHandle {
    fn submit(&self, line: &str) {
        drive(&self.session, &*self.bridge, |session, env| {
            session.submit(line, env)
        });
        self.signals.wake();
    }

    fn launch(&self, payload: Option<&AppPayload>) {
        let Some(script) = payload
            .and_then(AppPayload::file)
            .filter(|file| file.kind == FileKind::Batch)
        else {
            return;
        };
        drive(&self.session, &*self.bridge, |session, env| {
            session.launch_script(script, env);
            StepOutcome::Progressed
        });
        self.signals.wake();
    }

    fn resume(&self) {
        self.signals.resume();
    }
}

#[component]
/// Terminal window contents.
pub fn TerminalApp(
    /// Runtime-provided mount context.
    context: AppMountContext,
) -> impl IntoView {
    let session = ShellSession::new(context.user_name.clone())
        .with_logoff_delay(context.timing.logoff_delay);
    let view_state = create_rw_signal(session.view());
    let session = Rc::new(RefCell::new(session));
    let bridge = Rc::new(TerminalBridge::new(
        context.services.files,
        context.services.window,
        view_state,
    ));
    let (signals, rx) = script_channel();
    spawn_script_task(
        ScriptTask::new(session.clone(), bridge.clone(), rx)
            .with_pacing(context.timing.pacing)
            .with_cancellation(context.lifetime.clone()),
    );
    let terminal = Rc::new(TerminalHandle {
        session,
        bridge,
        signals,
    });

    let lifetime = context.lifetime.clone();
    on_cleanup(move || lifetime.cancel());

    let payload = context.payload;
    create_effect({
        let terminal = terminal.clone();
        move |_| payload.with(|payload| terminal.launch(payload.as_ref()))
    });

    let resume_listeners = Rc::new(RefCell::new(ResumeListeners::default()));
    create_effect({
        let resume_listeners = resume_listeners.clone();
        let terminal = terminal.clone();
        move |_| {
            let paused = view_state.with(|view| view.paused);
            let stale = resume_listeners.borrow_mut().sync(paused, || {
                let on_key = {
                    let terminal = terminal.clone();
                    move |_: KeyboardEvent| terminal.resume()
                };
                let on_mouse = {
                    let terminal = terminal.clone();
                    move |_: MouseEvent| terminal.resume()
                };
                vec![
                    window_event_listener(ev::keydown, on_key),
                    window_event_listener(ev::mousedown, on_mouse),
                ]
            });
            for handle in stale {
                handle.remove();
            }
        }
    });
    on_cleanup(move || {
        for handle in resume_listeners.borrow_mut().take() {
            handle.remove();
        }
    });

    let input = create_rw_signal(String::new());
    let history = create_rw_signal(CommandHistory::default());
    let screen = create_node_ref::<html::Div>();
    let input_ref = create_node_ref::<html::Input>();

    create_effect(move |_| {
        view_state.with(|_| ());
        if let Some(screen) = screen.get() {
            screen.set_scroll_top(screen.scroll_height());
        }
    });

    let on_keydown = {
        let terminal = terminal.clone();
        move |ev: KeyboardEvent| match ev.key().as_str() {
            "Enter" => {
                ev.stop_propagation();
                if view_state.with_untracked(|view| view.paused) {
                    return;
                }
                let line = input.get_untracked();
                input.set(String::new());
                history.update(|history| history.push(&line));
                terminal.submit(&line);
            }
            "ArrowUp" => {
                ev.prevent_default();
                let mut next = None;
                history.update(|history| next = history.step(HistoryStep::Older));
                if let Some(next) = next {
                    input.set(next);
                }
            }
            "ArrowDown" => {
                ev.prevent_default();
                let mut next = None;
                history.update(|history| next = history.step(HistoryStep::Newer));
                if let Some(next) = next {
                    input.set(next);
                }
            }
            _ => {}
        }
    };

    let indexed_lines = move || {
        view_state
            .get()
            .transcript
            .into_iter()
            .enumerate()
            .collect::<Vec<_>>()
    };

    view! {
        <div
            class="app-shell app-terminal-shell"
            data-ui-kind="app-shell"
            style:color=move || view_state.with(|view| view.text_color.clone())
            on:click=move |_| {
                if let Some(input) = input_ref.get_untracked() {
                    let _ = input.focus();
                }
            }
        >
            <div node_ref=screen class="terminal-screen" role="log" aria-live="polite">
                <For each=indexed_lines key=|(idx, line)| (*idx, line.clone()) let:entry>
                    <div class="terminal-line">{entry.1}</div>
                </For>
                <div class="terminal-input-row">
                    <span class="terminal-prompt">{move || view_state.with(|view| view.prompt.clone())}</span>
                    <input
                        node_ref=input_ref
                        class="terminal-input"
                        type="text"
                        autofocus=true
                        autocomplete="off"
                        spellcheck="false"
                        disabled=move || view_state.with(|view| view.paused)
                        prop:value=move || input.get()
                        on:input=move |ev| input.set(event_target_value(&ev))
                        on:keydown=on_keydown
                    />
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn history_walks_older_then_back_to_an_empty_line() {
        let mut history = CommandHistory::default();
        assert_eq!(history.step(HistoryStep::Older), None);

        history.push("dir");
        history.push("   ");
        history.push("echo hi");

        assert_eq!(history.step(HistoryStep::Older).as_deref(), Some("echo hi"));
        assert_eq!(history.step(HistoryStep::Older).as_deref(), Some("dir"));
        assert_eq!(history.step(HistoryStep::Older).as_deref(), Some("dir"));
        assert_eq!(history.step(HistoryStep::Newer).as_deref(), Some("echo hi"));
        assert_eq!(history.step(HistoryStep::Newer).as_deref(), Some(""));

        history.step(HistoryStep::Older);
        history.push("cls");
        assert_eq!(history.step(HistoryStep::Older).as_deref(), Some("cls"));
    }

    #[test]
    fn resume_listeners_attach_for_a_pause_and_detach_on_resume() {
        let mut listeners = ResumeListeners::default();
        let mut attached = 0;

        assert!(listeners.sync(false, || unreachable!()).is_empty());
        assert!(!listeners.is_listening());

        let removed = listeners.sync(true, || {
            attached += 1;
            vec!["keydown", "mousedown"]
        });
        assert!(removed.is_empty());
        assert!(listeners.is_listening());

        assert!(listeners.sync(true, || unreachable!()).is_empty());
        assert_eq!(attached, 1);

        assert_eq!(listeners.sync(false, Vec::new), vec!["keydown", "mousedown"]);
        assert!(!listeners.is_listening());
        assert!(listeners.sync(false, || unreachable!()).is_empty());
    }

    #[test]
    fn resume_listeners_are_handed_back_on_teardown() {
        let mut listeners = ResumeListeners::default();
        listeners.sync(true, || vec![1, 2]);

        assert_eq!(listeners.take(), vec![1, 2]);
        assert!(!listeners.is_listening());
        assert!(listeners.take().is_empty());
    }
}

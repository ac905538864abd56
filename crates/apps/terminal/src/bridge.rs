//! Connects a [`ShellSession`] to the desktop: store snapshots, the wall clock, and window
//! requests.
//!
//! [`ShellSession`]: system_shell::ShellSession

use chrono::{Local, NaiveDateTime};
use desktop_app_contract::{AppId, AppPayload, FileService, WindowService};
use leptos::{logging, RwSignal, SignalSet};
use platform_host::VirtualFileStore;
use system_shell::{HostRequest, SessionView, ShellHost};
use system_shell_contract::LaunchRequest;

/// Resolves a `start` request to an app and payload; unknown ids yield `None`.
pub fn launch_target(request: &LaunchRequest) -> Option<(AppId, Option<AppPayload>)> {
    let app_id = AppId::from_token(&request.app)?;
    Some((app_id, request.url.clone().map(AppPayload::Url)))
}

/// [`ShellHost`] backed by the runtime's app services.
pub struct TerminalBridge {
    files: FileService,
    window: WindowService,
    view: RwSignal<SessionView>,
}

impl TerminalBridge {
    /// Creates a bridge that renders into `view`.
    pub fn new(files: FileService, window: WindowService, view: RwSignal<SessionView>) -> Self {
        Self {
            files,
            window,
            view,
        }
    }
}

impl ShellHost for TerminalBridge {
    fn files(&self) -> VirtualFileStore {
        self.files.snapshot()
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn perform(&self, request: HostRequest) {
        match request {
            HostRequest::CreateFolder { parent, name } => self.files.create_folder(parent, name),
            HostRequest::OpenApp(request) => match launch_target(&request) {
                Some((app_id, payload)) => self.window.open_app(app_id, payload),
                None => logging::warn!("terminal ignored unknown app id `{}`", request.app),
            },
            HostRequest::CloseWindow => self.window.close(),
            HostRequest::LogOff(delay) => self.window.log_off(delay.as_millis() as u64),
        }
    }

    fn render(&self, view: SessionView) {
        self.view.set(view);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use desktop_app_contract::{AppCommand, AppServices};
    use leptos::{create_runtime, create_rw_signal, Callback, Signal, SignalGetUntracked};
    use platform_host::{NoopChatService, ParentFolder, RootFolder};
    use pretty_assertions::assert_eq;
    use system_shell::ShellSession;

    use super::*;

    #[test]
    fn launch_targets_resolve_known_ids_and_carry_urls() {
        assert_eq!(
            launch_target(&LaunchRequest::browser("https://example.com")),
            Some((
                AppId::Browser,
                Some(AppPayload::Url("https://example.com".to_string()))
            ))
        );
        assert_eq!(
            launch_target(&LaunchRequest::app("calculator")),
            Some((AppId::Calculator, None))
        );
        assert_eq!(launch_target(&LaunchRequest::app("paint")), None);
    }

    #[test]
    fn host_requests_become_app_commands() {
        let runtime = create_runtime();
        let sent = Rc::new(RefCell::new(Vec::new()));
        let sink = sent.clone();
        let sender = Callback::new(move |command: AppCommand| sink.borrow_mut().push(command));
        let services = AppServices::new(
            sender,
            Signal::derive(VirtualFileStore::seeded),
            Rc::new(NoopChatService),
        );
        let view = create_rw_signal(ShellSession::new("Guest").view());
        let bridge = TerminalBridge::new(services.files, services.window, view);

        bridge.perform(HostRequest::CreateFolder {
            parent: ParentFolder::Root(RootFolder::Desktop),
            name: "Work".to_string(),
        });
        bridge.perform(HostRequest::OpenApp(LaunchRequest::app("paint")));
        bridge.perform(HostRequest::OpenApp(LaunchRequest::app("notepad")));
        bridge.perform(HostRequest::LogOff(Duration::from_millis(800)));
        bridge.perform(HostRequest::CloseWindow);

        assert_eq!(
            *sent.borrow(),
            vec![
                AppCommand::CreateFolder {
                    parent: ParentFolder::Root(RootFolder::Desktop),
                    name: "Work".to_string(),
                },
                AppCommand::OpenApp {
                    app_id: AppId::Notepad,
                    payload: None,
                },
                AppCommand::LogOff { delay_ms: 800 },
                AppCommand::CloseWindow,
            ]
        );
        assert_eq!(bridge.files().len(), 1);

        bridge.render(SessionView {
            prompt: "X>".to_string(),
            ..ShellSession::new("Guest").view()
        });
        assert_eq!(view.get_untracked().prompt, "X>");
        runtime.dispose();
    }
}

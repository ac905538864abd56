//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived reducer container, the runtime effect queue, the shared file
//! store, and the bridge that turns [`AppCommand`] values from mounted apps into reducer actions
//! and store mutations. UI composition stays in [`crate::components`].

use std::{rc::Rc, time::Duration};

use desktop_app_contract::{AppCommand, AppServices, AppTiming};
use leptos::*;
use platform_host::{ChatService, FsError, VirtualFileStore};

use crate::{
    app_runtime::AppRuntimeState,
    config::DesktopConfig,
    effect_executor,
    model::{DesktopState, InteractionState, WindowId},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Reactive pointer/drag/resize interaction state signal.
    pub interaction: RwSignal<InteractionState>,
    /// Queue of runtime effects emitted by the reducer and drained by the effect executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Process-wide virtual file store.
    pub files: RwSignal<VirtualFileStore>,
    /// Per-window lifetime tokens.
    pub app_runtime: StoredValue<AppRuntimeState>,
    /// Chat backend handed to the Copilot app.
    pub chat: StoredValue<Rc<dyn ChatService>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Delays configured for mounted apps.
    pub fn app_timing(&self) -> AppTiming {
        self.state.with_untracked(|state| AppTiming {
            pacing: state.config.pacing(),
            logoff_delay: state.config.logoff_delay(),
        })
    }

    /// Service bundle for an app mounted in `window_id`.
    pub fn app_services(&self, window_id: WindowId) -> AppServices {
        let runtime = *self;
        let sender = Callback::new(move |command: AppCommand| {
            handle_app_command(runtime, window_id, command)
        });
        AppServices::new(sender, self.files.into(), self.chat.get_value())
    }
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components.
pub fn DesktopProvider(
    /// Timing and layout constants.
    #[prop(optional)]
    config: Option<DesktopConfig>,
    /// Chat backend for the Copilot app.
    chat: Rc<dyn ChatService>,
    children: Children,
) -> impl IntoView {
    let state = create_rw_signal(DesktopState::with_config(config.unwrap_or_default()));
    let interaction = create_rw_signal(InteractionState::default());
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
    let files = create_rw_signal(VirtualFileStore::seeded());
    let app_runtime = store_value(AppRuntimeState::default());
    let chat = store_value(chat);

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut desktop = state.get_untracked();
        let mut ui = interaction.get_untracked();
        let previous_desktop = desktop.clone();
        let previous_ui = ui.clone();

        match reduce_desktop(&mut desktop, &mut ui, action) {
            Ok(new_effects) => {
                if desktop != previous_desktop {
                    state.set(desktop);
                }
                if ui != previous_ui {
                    interaction.set(ui);
                }
                if !new_effects.is_empty() {
                    let mut queue = effects.get_untracked();
                    queue.extend(new_effects);
                    effects.set(queue);
                }
            }
            Err(err) => logging::warn!("desktop reducer error: {err}"),
        }
    });

    let runtime = DesktopRuntimeContext {
        state,
        interaction,
        effects,
        files,
        app_runtime,
        chat,
        dispatch,
    };

    provide_context(runtime);
    effect_executor::install(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}

/// Applies a store mutation carried by `command`.
///
/// Returns `Ok(false)` for commands that do not touch the store.
///
/// # Errors
///
/// Returns the store's [`FsError`]; the store is unchanged in that case.
pub fn apply_file_command(
    store: &mut VirtualFileStore,
    command: &AppCommand,
) -> Result<bool, FsError> {
    match command {
        AppCommand::SaveFile(draft) => {
            store.save(draft.clone());
        }
        AppCommand::CreateFolder { parent, name } => {
            store.create_folder(name, parent.clone())?;
        }
        AppCommand::CreateUniqueFolder { parent, base } => {
            store.create_unique_folder(parent.clone(), base)?;
        }
        AppCommand::RenameFile { id, name } => store.rename(id, name)?,
        AppCommand::DeleteFile { id } => {
            store.delete(id)?;
        }
        AppCommand::OpenApp { .. } | AppCommand::CloseWindow | AppCommand::LogOff { .. } => {
            return Ok(false)
        }
    }
    Ok(true)
}

fn handle_app_command(runtime: DesktopRuntimeContext, window_id: WindowId, command: AppCommand) {
    match command {
        AppCommand::OpenApp { app_id, payload } => {
            runtime.dispatch_action(DesktopAction::OpenApp { app_id, payload });
        }
        AppCommand::CloseWindow => {
            runtime.dispatch_action(DesktopAction::CloseWindow { window_id });
        }
        AppCommand::LogOff { delay_ms } => {
            set_timeout(
                move || runtime.dispatch_action(DesktopAction::LogOff),
                Duration::from_millis(delay_ms),
            );
        }
        command => {
            let mut store = runtime.files.get_untracked();
            match apply_file_command(&mut store, &command) {
                Ok(_) => runtime.files.set(store),
                Err(err) => logging::warn!("file command from window {} failed: {err}", window_id.0),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use platform_host::{FileDraft, FileId, ParentFolder, RootFolder};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn file_commands_mutate_the_store_and_others_are_skipped() {
        let mut store = VirtualFileStore::seeded();
        let desktop = ParentFolder::Root(RootFolder::Desktop);

        assert_eq!(
            apply_file_command(
                &mut store,
                &AppCommand::SaveFile(FileDraft::text("run", "bat", RootFolder::Desktop, "dir"))
            ),
            Ok(true)
        );
        for _ in 0..2 {
            apply_file_command(
                &mut store,
                &AppCommand::CreateUniqueFolder {
                    parent: desktop.clone(),
                    base: "New Folder".to_string(),
                },
            )
            .expect("folder");
        }
        let names: Vec<String> = store.children(&desktop).map(|f| f.name.clone()).collect();
        assert_eq!(names, vec!["run", "New Folder", "New Folder (2)"]);

        assert_eq!(apply_file_command(&mut store, &AppCommand::CloseWindow), Ok(false));
    }

    #[test]
    fn failed_commands_leave_the_store_unchanged() {
        let mut store = VirtualFileStore::seeded();
        let before = store.clone();
        let missing = FileId("missing".to_string());

        assert_eq!(
            apply_file_command(&mut store, &AppCommand::DeleteFile { id: missing.clone() }),
            Err(FsError::NotFound(missing))
        );
        let readme = store.entries()[0].id.clone();
        assert_eq!(
            apply_file_command(
                &mut store,
                &AppCommand::RenameFile {
                    id: readme,
                    name: "  ".to_string()
                }
            ),
            Err(FsError::EmptyName)
        );
        assert_eq!(store, before);
    }
}

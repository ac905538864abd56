//! File Explorer window over the shared virtual file store.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod model;

use desktop_app_contract::{AppMountContext, FileService, WindowService};
use leptos::*;
use platform_host::{FolderView, VirtualFile};

pub use model::{
    file_icon, open_action, sidebar_entries, ExplorerState, OpenAction, SidebarEntry, ViewMode,
};

/// Text shown when the current view has no matching entries.
pub const EMPTY_FOLDER_TEXT: &str = "Empty folder";

/// Mounts an Explorer window.
pub fn mount_explorer(context: AppMountContext) -> View {
    view! { <ExplorerApp context=context /> }.into_view()
}

#[component]
/// Explorer window contents.
pub fn ExplorerApp(
    /// Runtime-provided mount context.
    context: AppMountContext,
) -> impl IntoView {
    let files: FileService = context.services.files;
    let window: WindowService = context.services.window;
    let store = files.store;
    let state = create_rw_signal(ExplorerState::default());

    create_effect(move |_| {
        let snapshot = store.get();
        let needs_fix = state.with_untracked(|s| {
            let mut next = s.clone();
            next.reconcile(&snapshot);
            (next != *s).then_some(next)
        });
        if let Some(next) = needs_fix {
            state.set(next);
        }
    });

    let entries = Signal::derive(move || state.with(|s| store.with(|files| s.visible(files))));
    let breadcrumb = Signal::derive(move || state.with(|s| store.with(|files| files.breadcrumb(&s.view))));
    let can_create = Signal::derive(move || state.with(|s| s.new_folder_parent().is_some()));
    let has_selection = Signal::derive(move || state.with(|s| s.selected.is_some()));

    let open_entry = move |file: VirtualFile| match open_action(&file) {
        OpenAction::Navigate(view) => state.update(|s| s.navigate(view)),
        OpenAction::Launch { app_id, payload } => window.open_app(app_id, Some(payload)),
    };
    let new_folder = move |_| {
        let Some(parent) = state.with_untracked(ExplorerState::new_folder_parent) else {
            return;
        };
        let base = state.with_untracked(|s| s.new_folder_base());
        files.create_unique_folder(parent, base);
    };
    let begin_rename = move |_| {
        let snapshot = store.get_untracked();
        state.update(|s| s.begin_rename(&snapshot));
    };
    let commit_rename = move || {
        let mut renamed = None;
        state.update(|s| renamed = s.commit_rename());
        if let Some((id, name)) = renamed {
            files.rename(id, name);
        }
    };
    let delete_selected = move |_| {
        if let Some(id) = state.with_untracked(|s| s.selected.clone()) {
            files.delete(id);
        }
    };

    view! {
        <div class="app-shell app-explorer-shell" data-ui-kind="app-shell">
            <div class="app-toolbar" role="toolbar" aria-label="Explorer commands">
                <button
                    type="button"
                    title="Up"
                    on:click=move |_| {
                        let snapshot = store.get_untracked();
                        state.update(|s| s.up(&snapshot));
                    }
                >
                    "Up"
                </button>
                <button type="button" disabled=move || !can_create.get() on:click=new_folder>
                    "New folder"
                </button>
                <button type="button" disabled=move || !has_selection.get() on:click=begin_rename>
                    "Rename"
                </button>
                <button type="button" disabled=move || !has_selection.get() on:click=delete_selected>
                    "Delete"
                </button>
                <button
                    type="button"
                    aria-pressed=move || state.with(|s| s.view_mode == ViewMode::Grid)
                    on:click=move |_| state.update(|s| s.view_mode = ViewMode::Grid)
                >
                    "Grid"
                </button>
                <button
                    type="button"
                    aria-pressed=move || state.with(|s| s.view_mode == ViewMode::List)
                    on:click=move |_| state.update(|s| s.view_mode = ViewMode::List)
                >
                    "List"
                </button>
                <input
                    class="explorer-search"
                    type="search"
                    placeholder="Search"
                    prop:value=move || state.with(|s| s.filter.clone())
                    on:input=move |ev| {
                        let filter = event_target_value(&ev);
                        state.update(|s| s.filter = filter);
                    }
                />
            </div>

            <nav class="explorer-breadcrumb" aria-label="Location">
                <For
                    each=move || breadcrumb.get().into_iter().enumerate()
                    key=|(idx, segment)| (*idx, segment.label.clone())
                    let:item
                >
                    {
                        let (idx, segment) = item;
                        let target = segment.target.clone();
                        view! {
                            <Show when=move || idx != 0 fallback=|| ()>
                                <span class="crumb-sep">" > "</span>
                            </Show>
                            <button
                                type="button"
                                class="crumb"
                                on:click=move |_| state.update(|s| s.navigate(target.clone()))
                            >
                                {segment.label}
                            </button>
                        }
                    }
                </For>
            </nav>

            <div class="explorer-workspace">
                <aside class="explorer-tree" aria-label="Folder tree">
                    <ul class="tree-list">
                        {sidebar_entries()
                            .into_iter()
                            .map(|entry| view! { <TreeNode entry=entry state=state /> })
                            .collect_view()}
                    </ul>
                </aside>

                <section
                    class=move || match state.with(|s| s.view_mode) {
                        ViewMode::Grid => "explorer-pane explorer-grid",
                        ViewMode::List => "explorer-pane explorer-list",
                    }
                    on:click=move |_| state.update(|s| s.selected = None)
                >
                    <Show
                        when=move || !entries.with(Vec::is_empty)
                        fallback=|| view! { <div class="explorer-empty">{EMPTY_FOLDER_TEXT}</div> }
                    >
                        <For each=move || entries.get() key=|file| (file.id.clone(), file.name.clone()) let:file>
                            <ExplorerItem
                                file=file
                                state=state
                                on_open=Callback::new(open_entry)
                                on_commit_rename=Callback::new(move |_| commit_rename())
                            />
                        </For>
                    </Show>
                </section>
            </div>

            <div class="app-statusbar" data-ui-kind="status-bar">
                <span>{move || format!("{} item(s)", entries.with(Vec::len))}</span>
                <span>{move || state.with(|s| s.title(&store.get()))}</span>
            </div>
        </div>
    }
}

#[component]
fn TreeNode(entry: SidebarEntry, state: RwSignal<ExplorerState>) -> impl IntoView {
    let target = entry.target.clone();
    let glyph = if matches!(entry.target, FolderView::Home) { "home" } else { "folder" };
    let is_selected = Signal::derive(move || state.with(|s| s.view == entry.target));
    view! {
        <li>
            <button
                type="button"
                class=move || if is_selected.get() { "tree-node selected" } else { "tree-node" }
                on:click=move |_| state.update(|s| s.navigate(target.clone()))
            >
                <span class="tree-glyph">{glyph}</span>
                <span>{entry.label}</span>
            </button>
        </li>
    }
}

#[component]
fn ExplorerItem(
    file: VirtualFile,
    state: RwSignal<ExplorerState>,
    on_open: Callback<VirtualFile>,
    on_commit_rename: Callback<()>,
) -> impl IntoView {
    let id = file.id.clone();
    let select_id = id.clone();
    let selected_id = id.clone();
    let renaming_id = id;
    let is_selected = Signal::derive(move || state.with(|s| s.selected.as_ref() == Some(&selected_id)));
    let is_renaming = Signal::derive(move || {
        state.with(|s| s.renaming.as_ref().is_some_and(|(id, _)| *id == renaming_id))
    });
    let icon = file_icon(&file);
    let label = file.file_name();
    let open_file = file.clone();

    view! {
        <div
            class=move || if is_selected.get() { "explorer-item selected" } else { "explorer-item" }
            data-icon=icon
            on:click=move |ev| {
                ev.stop_propagation();
                state.update(|s| s.selected = Some(select_id.clone()));
            }
            on:dblclick=move |_| on_open.call(open_file.clone())
        >
            <span class="explorer-item-icon">{icon}</span>
            <Show
                when=move || is_renaming.get()
                fallback=move || view! { <span class="explorer-item-name">{label.clone()}</span> }
            >
                <input
                    class="explorer-rename"
                    type="text"
                    prop:value=move || {
                        state.with(|s| s.renaming.as_ref().map(|(_, name)| name.clone()).unwrap_or_default())
                    }
                    on:input=move |ev| {
                        let name = event_target_value(&ev);
                        state.update(|s| {
                            if let Some((_, draft)) = s.renaming.as_mut() {
                                *draft = name;
                            }
                        });
                    }
                    on:keydown=move |ev: ev::KeyboardEvent| match ev.key().as_str() {
                        "Enter" => on_commit_rename.call(()),
                        "Escape" => state.update(|s| s.renaming = None),
                        _ => {}
                    }
                    on:blur=move |_| on_commit_rename.call(())
                />
            </Show>
        </div>
    }
}

//! Notepad and Word windows over the shared virtual file store.
//!
//! Both windows edit an [`EditorDocument`]; saving sends a [`platform_host::FileDraft`] to the
//! runtime, which upserts it into the store.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod document;

use desktop_app_contract::{AppMountContext, AppPayload, FileService};
use leptos::*;
use platform_host::RootFolder;

pub use document::{
    count_matches, find_next, find_previous, EditorDocument, EditorMode, BATCH_TEMPLATE,
    NOTEPAD_EXTENSIONS,
};

const SAVED_FLASH_MS: u64 = 2000;

/// Mounts a Notepad window.
pub fn mount_notepad(context: AppMountContext) -> View {
    view! { <EditorApp context=context mode=EditorMode::Notepad /> }.into_view()
}

/// Mounts a Word window.
pub fn mount_word(context: AppMountContext) -> View {
    view! { <EditorApp context=context mode=EditorMode::Word /> }.into_view()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SaveDialogState {
    name: String,
    extension: String,
    folder: RootFolder,
}

#[component]
/// Editor window contents for either mode.
pub fn EditorApp(
    /// Runtime-provided mount context.
    context: AppMountContext,
    /// Editor flavour.
    mode: EditorMode,
) -> impl IntoView {
    let files: FileService = context.services.files;
    let payload = context.payload;
    let document = create_rw_signal(EditorDocument::open(
        mode,
        payload.get_untracked().as_ref().and_then(AppPayload::file),
    ));
    let save_dialog = create_rw_signal(None::<SaveDialogState>);
    let find_open = create_rw_signal(false);
    let find_query = create_rw_signal(String::new());
    let saved_flash = create_rw_signal(false);
    let textarea = create_node_ref::<html::Textarea>();

    create_effect(move |previous: Option<()>| {
        let next = payload.get();
        if previous.is_some() {
            document.set(EditorDocument::open(
                mode,
                next.as_ref().and_then(AppPayload::file),
            ));
        }
    });

    let flash_saved = move || {
        saved_flash.set(true);
        set_timeout(
            move || saved_flash.set(false),
            std::time::Duration::from_millis(SAVED_FLASH_MS),
        );
    };

    let save = move |_| {
        files.save(document.get_untracked().save_draft());
        flash_saved();
    };
    let open_save_as = move |_| {
        let doc = document.get_untracked();
        save_dialog.set(Some(SaveDialogState {
            name: doc.name,
            extension: doc.extension,
            folder: RootFolder::Documents,
        }));
    };
    let confirm_save_as = move |_| {
        let Some(dialog) = save_dialog.get_untracked() else {
            return;
        };
        let mut draft = None;
        document.update(|doc| draft = Some(doc.save_as(&dialog.name, &dialog.extension, dialog.folder)));
        if let Some(draft) = draft {
            files.save(draft);
        }
        save_dialog.set(None);
        flash_saved();
    };

    let match_count =
        Signal::derive(move || count_matches(&document.get().content, &find_query.get()));
    let run_find = move |forward: bool| {
        let Some(element) = textarea.get_untracked() else {
            return;
        };
        let content = document.get_untracked().content;
        let query = find_query.get_untracked();
        let cursor_utf16 = if forward {
            element.selection_end()
        } else {
            element.selection_start()
        }
        .ok()
        .flatten()
        .unwrap_or(0);
        let cursor = byte_offset(&content, cursor_utf16 as usize);
        let found = if forward {
            find_next(&content, &query, cursor)
        } else {
            find_previous(&content, &query, cursor)
        };
        if let Some((start, end)) = found {
            let _ = element.focus();
            let _ = element.set_selection_range(
                utf16_offset(&content, start) as u32,
                utf16_offset(&content, end) as u32,
            );
        }
    };

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.ctrl_key() && ev.key().eq_ignore_ascii_case("f") {
            ev.prevent_default();
            find_open.set(true);
        }
    };

    let status = Signal::derive(move || {
        let doc = document.get();
        match mode {
            EditorMode::Notepad => format!("Lines: {} | Chars: {}", doc.line_count(), doc.char_count()),
            EditorMode::Word => format!("{} words", doc.word_count()),
        }
    });

    let shell_class = match mode {
        EditorMode::Notepad => "app-shell app-notepad-shell",
        EditorMode::Word => "app-shell app-word-shell",
    };

    view! {
        <div
            class=shell_class
            data-ui-kind="app-shell"
            on:keydown=on_keydown
        >
            <div class="editor-menubar" role="menubar" aria-label="Editor menu">
                <button
                    type="button"
                    role="menuitem"
                    on:click=move |_| document.set(EditorDocument::blank(mode))
                >
                    "New"
                </button>
                <Show when=move || mode == EditorMode::Notepad fallback=|| ()>
                    <button
                        type="button"
                        role="menuitem"
                        on:click=move |_| document.set(EditorDocument::new_batch_script())
                    >
                        "New Batch Script"
                    </button>
                </Show>
                <button type="button" role="menuitem" on:click=save>"Save"</button>
                <button type="button" role="menuitem" on:click=open_save_as>"Save As..."</button>
                <button type="button" role="menuitem" on:click=move |_| find_open.set(true)>
                    "Find..."
                </button>
                <button
                    type="button"
                    role="menuitem"
                    on:click=move |_| document.update(|doc| doc.content.clear())
                >
                    "Clear All"
                </button>
                <span class="editor-menubar-spacer"></span>
                <Show when=move || saved_flash.get() fallback=|| ()>
                    <span class="editor-saved">"Saved"</span>
                </Show>
                <span class="editor-file-name">{move || document.get().file_name()}</span>
            </div>

            <Show when=move || find_open.get() fallback=|| ()>
                <div class="editor-find" role="search">
                    <input
                        type="text"
                        placeholder="Find text..."
                        prop:value=move || find_query.get()
                        on:input=move |ev| find_query.set(event_target_value(&ev))
                        on:keydown=move |ev: ev::KeyboardEvent| match ev.key().as_str() {
                            "Enter" => run_find(true),
                            "Escape" => find_open.set(false),
                            _ => {}
                        }
                    />
                    <Show when=move || !find_query.get().is_empty() fallback=|| ()>
                        <span class="editor-find-count">
                            {move || format!("{} results", match_count.get())}
                        </span>
                    </Show>
                    <button type="button" title="Previous" on:click=move |_| run_find(false)>"Prev"</button>
                    <button type="button" title="Next" on:click=move |_| run_find(true)>"Next"</button>
                    <button type="button" title="Close" on:click=move |_| find_open.set(false)>"x"</button>
                </div>
            </Show>

            <textarea
                node_ref=textarea
                class="editor-page"
                data-ui-kind="text-area"
                placeholder="Start typing..."
                spellcheck="false"
                prop:value=move || document.get().content
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    document.update(|doc| doc.content = text);
                }
            />

            <div class="editor-statusbar" data-ui-kind="status-bar">
                <span>{move || status.get()}</span>
            </div>

            <Show when=move || save_dialog.get().is_some() fallback=|| ()>
                <div class="editor-dialog-backdrop">
                    <div class="editor-dialog" role="dialog" aria-label="Save As">
                        <h2>"Save As"</h2>
                        <label>
                            "File Name"
                            <input
                                type="text"
                                prop:value=move || save_dialog.get().map(|d| d.name).unwrap_or_default()
                                on:input=move |ev| {
                                    let name = event_target_value(&ev);
                                    save_dialog.update(|d| {
                                        if let Some(d) = d {
                                            d.name = name;
                                        }
                                    });
                                }
                            />
                        </label>
                        <select
                            prop:value=move || save_dialog.get().map(|d| d.extension).unwrap_or_default()
                            on:change=move |ev| {
                                let extension = event_target_value(&ev);
                                save_dialog.update(|d| {
                                    if let Some(d) = d {
                                        d.extension = extension;
                                    }
                                });
                            }
                        >
                            {mode
                                .extensions()
                                .iter()
                                .map(|ext| view! { <option value=*ext>{format!(".{ext}")}</option> })
                                .collect_view()}
                        </select>
                        <div class="editor-dialog-locations" role="radiogroup" aria-label="Save Location">
                            {RootFolder::ALL
                                .into_iter()
                                .map(|folder| {
                                    view! {
                                        <button
                                            type="button"
                                            role="radio"
                                            aria-checked=move || {
                                                save_dialog.get().map(|d| d.folder == folder).unwrap_or(false)
                                            }
                                            on:click=move |_| {
                                                save_dialog.update(|d| {
                                                    if let Some(d) = d {
                                                        d.folder = folder;
                                                    }
                                                });
                                            }
                                        >
                                            {folder.label()}
                                        </button>
                                    }
                                })
                                .collect_view()}
                        </div>
                        <div class="editor-dialog-actions">
                            <button type="button" on:click=confirm_save_as>"Save"</button>
                            <button type="button" on:click=move |_| save_dialog.set(None)>"Cancel"</button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}

fn byte_offset(text: &str, utf16_index: usize) -> usize {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        if units >= utf16_index {
            return byte;
        }
        units += ch.len_utf16();
    }
    text.len()
}

fn utf16_offset(text: &str, byte_index: usize) -> usize {
    text[..byte_index.min(text.len())].encode_utf16().count()
}

use std::time::Duration;

use super::*;
use crate::chrome::{clock_lines, taskbar_entries, TaskbarEntry};

#[component]
pub(super) fn Taskbar() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let clock_now = create_rw_signal(local_now());
    let entries = create_memo(move |_| state.with(taskbar_entries));

    if let Ok(interval) =
        set_interval_with_handle(move || clock_now.set(local_now()), Duration::from_secs(1))
    {
        on_cleanup(move || interval.clear());
    }

    view! {
        <footer
            class="taskbar"
            role="toolbar"
            aria-label="Taskbar"
            style=move || format!("height:{}px;", state.with(|s| s.config.taskbar_height))
        >
            <div class="taskbar-center">
                <button
                    type="button"
                    class=move || if state.with(|s| s.start_menu_open) { "taskbar-start active" } else { "taskbar-start" }
                    aria-label="Start"
                    aria-expanded=move || state.with(|s| s.start_menu_open).to_string()
                    on:click=move |_| runtime.dispatch_action(DesktopAction::ToggleStartMenu)
                >
                    <span class="taskbar-start-glyph" aria-hidden="true"></span>
                </button>
                <For each=move || entries.get() key=|entry| *entry let:entry>
                    <TaskbarButton entry=entry />
                </For>
            </div>
            <div class="taskbar-tray">
                <button
                    type="button"
                    class="taskbar-quick-settings"
                    aria-label="Quick settings"
                    on:click=move |_| runtime.dispatch_action(DesktopAction::ToggleQuickSettings)
                >
                    <span data-icon=move || {
                        if state.with(|s| s.quick_settings.wifi_enabled) { "wifi" } else { "wifi-off" }
                    }></span>
                    <span data-icon="volume"></span>
                </button>
                <div class="taskbar-clock" aria-live="off">
                    {move || {
                        let (time, date) = clock_lines(clock_now.get());
                        view! {
                            <span class="taskbar-clock-time">{time}</span>
                            <span class="taskbar-clock-date">{date}</span>
                        }
                    }}
                </div>
            </div>
        </footer>
    }
}

#[component]
fn TaskbarButton(entry: TaskbarEntry) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let app_id = entry.app_id;
    let class = format!(
        "taskbar-app{}{}",
        if entry.is_open { " open" } else { "" },
        if entry.is_active { " active" } else { "" },
    );

    view! {
        <button
            type="button"
            class=class
            title=app_id.label()
            aria-label=app_id.label()
            aria-pressed=entry.is_active.to_string()
            data-icon=app_id.icon()
            on:click=move |_| runtime.dispatch_action(DesktopAction::OpenApp { app_id, payload: None })
        >
            <span class="taskbar-app-indicator" aria-hidden="true"></span>
        </button>
    }
}

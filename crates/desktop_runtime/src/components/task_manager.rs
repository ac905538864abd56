use std::time::Duration;

use super::*;
use crate::chrome::{process_rows, SystemStats, NO_APPS_RUNNING, PROCESS_STATUS};

fn random_unit() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Math::random()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        0.5
    }
}

#[component]
pub(super) fn TaskManager() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let rows = create_memo(move |_| runtime.state.with(process_rows));
    let stats = create_rw_signal(SystemStats::default());

    if let Ok(interval) = set_interval_with_handle(
        move || stats.set(SystemStats::sample(random_unit)),
        Duration::from_millis(SystemStats::REFRESH_MS),
    ) {
        on_cleanup(move || interval.clear());
    }

    view! {
        <div class="app-shell app-taskmanager-shell">
            <div class="taskmanager-gauges" role="group" aria-label="Performance">
                <span>{move || format!("CPU {}%", stats.get().cpu)}</span>
                <span>{move || format!("Memory {}%", stats.get().memory)}</span>
                <span>{move || format!("Disk {}%", stats.get().disk)}</span>
            </div>
            <table class="taskmanager-table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"PID"</th>
                        <th>"Status"</th>
                        <th>"Memory"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For each=move || rows.get() key=|row| row.window_id.0 let:row>
                        {
                            let window_id = row.window_id;
                            view! {
                                <tr>
                                    <td>
                                        <div>{row.name}</div>
                                        <div class="taskmanager-image">{row.image}</div>
                                    </td>
                                    <td>{row.pid}</td>
                                    <td>{PROCESS_STATUS}</td>
                                    <td>{format!("{} MB", row.memory_mb)}</td>
                                    <td>
                                        <button
                                            type="button"
                                            class="app-action"
                                            on:click=move |_| {
                                                runtime.dispatch_action(DesktopAction::CloseWindow { window_id })
                                            }
                                        >
                                            "End task"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    </For>
                </tbody>
            </table>
            <Show when=move || rows.with(Vec::is_empty) fallback=|| ()>
                <p class="taskmanager-empty">{NO_APPS_RUNNING}</p>
            </Show>
            <div class="app-statusbar">
                <span>{move || format!("Processes: {}", rows.with(Vec::len))}</span>
            </div>
        </div>
    }
}

//! Desktop shell UI composition and interaction surfaces.

mod menus;
mod screens;
mod task_manager;
mod taskbar;
mod window;

use desktop_app_contract::{AppId, AppMountContext};
use leptos::*;

use self::{
    menus::{QuickSettingsPanel, StartMenu},
    screens::{LoginScreen, WelcomeScreen},
    task_manager::TaskManager,
    taskbar::Taskbar,
    window::DesktopWindow,
};

use crate::{
    chrome::desktop_icons,
    model::{PointerPosition, ResizeEdge, SessionPhase, WindowRect},
    reducer::DesktopAction,
};

pub use crate::runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};

const FALLBACK_VIEWPORT: WindowRect = WindowRect {
    x: 0,
    y: 0,
    w: 1280,
    h: 800,
};

pub(crate) fn mount_task_manager(_: AppMountContext) -> View {
    view! { <TaskManager /> }.into_view()
}

#[component]
/// Renders the login screen, welcome screen, or desktop for the current session phase.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let phase = create_memo(move |_| runtime.state.with(|state| state.phase));

    move || match phase.get() {
        SessionPhase::SignedOut => view! { <LoginScreen /> }.into_view(),
        SessionPhase::Welcome => view! { <WelcomeScreen /> }.into_view(),
        SessionPhase::Desktop => view! { <Desktop /> }.into_view(),
    }
}

#[component]
fn Desktop() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let brightness = create_memo(move |_| state.with(|s| s.quick_settings.brightness));

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        let pointer = pointer_from_pointer_event(&ev);
        let interaction = runtime.interaction.get_untracked();

        if interaction.dragging.is_some() {
            runtime.dispatch_action(DesktopAction::UpdateMove { pointer });
        }
        if interaction.resizing.is_some() {
            runtime.dispatch_action(DesktopAction::UpdateResize { pointer });
        }
    };
    let on_pointer_end = move |_| end_active_pointer_interaction(runtime);

    view! {
        <div
            id="desktop-shell-root"
            class="desktop-shell"
            tabindex="-1"
            style=move || format!("filter:brightness({}%);", brightness.get().max(20))
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_end
            on:pointercancel=on_pointer_end
        >
            <div
                class="desktop-backdrop"
                on:mousedown=move |_| runtime.dispatch_action(DesktopAction::CloseMenus)
            >
                <div class="desktop-icon-grid">
                    {desktop_icons()
                        .iter()
                        .copied()
                        .map(|app_id| view! { <DesktopIcon app_id=app_id /> })
                        .collect_view()}
                </div>
            </div>

            <div class="desktop-window-layer">
                <For each=move || state.get().windows key=|win| win.id.0 let:win>
                    <DesktopWindow window_id=win.id />
                </For>
            </div>

            <Show when=move || state.with(|s| s.start_menu_open) fallback=|| ()>
                <StartMenu />
            </Show>
            <Show when=move || state.with(|s| s.quick_settings_open) fallback=|| ()>
                <QuickSettingsPanel />
            </Show>

            <Taskbar />
        </div>
    }
}

#[component]
fn DesktopIcon(app_id: AppId) -> impl IntoView {
    let runtime = use_desktop_runtime();

    view! {
        <button
            type="button"
            class="desktop-icon"
            data-icon=app_id.icon()
            on:mousedown=move |ev| ev.stop_propagation()
            on:click=move |_| {
                runtime.dispatch_action(DesktopAction::OpenApp { app_id, payload: None })
            }
        >
            <span class="desktop-icon-glyph" aria-hidden="true"></span>
            <span class="desktop-icon-label">{app_id.label()}</span>
        </button>
    }
}

fn desktop_viewport() -> WindowRect {
    #[cfg(target_arch = "wasm32")]
    {
        let size = web_sys::window().and_then(|window| {
            let w = window.inner_width().ok()?.as_f64()?;
            let h = window.inner_height().ok()?.as_f64()?;
            Some((w as i32, h as i32))
        });
        if let Some((w, h)) = size {
            return WindowRect { x: 0, y: 0, w, h };
        }
    }

    FALLBACK_VIEWPORT
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

fn end_active_pointer_interaction(runtime: DesktopRuntimeContext) {
    let interaction = runtime.interaction.get_untracked();
    if interaction.dragging.is_some() {
        runtime.dispatch_action(DesktopAction::EndMove);
    }
    if interaction.resizing.is_some() {
        runtime.dispatch_action(DesktopAction::EndResize);
    }
}

fn resize_edge_class(edge: ResizeEdge) -> &'static str {
    match edge {
        ResizeEdge::North => "edge-n",
        ResizeEdge::South => "edge-s",
        ResizeEdge::East => "edge-e",
        ResizeEdge::West => "edge-w",
        ResizeEdge::NorthEast => "edge-ne",
        ResizeEdge::NorthWest => "edge-nw",
        ResizeEdge::SouthEast => "edge-se",
        ResizeEdge::SouthWest => "edge-sw",
    }
}

fn local_now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

use super::*;
use crate::{apps, model::WindowId, window_manager::effective_rect};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

fn is_primary_press(ev: &web_sys::PointerEvent) -> bool {
    if ev.pointer_type() == "mouse" {
        ev.button() == 0
    } else {
        ev.is_primary()
    }
}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    // The body mounts once per window; only chrome attributes track state.
    let window = create_memo(move |_| state.with(|s| s.window(window_id).cloned()));
    let is_active = create_memo(move |_| state.with(|s| s.active_window_id() == Some(window_id)));
    let maximized = create_memo(move |_| window.with(|w| w.as_ref().is_some_and(|w| w.maximized)));
    let title = Signal::derive(move || window.with(|w| w.as_ref().map(|w| w.title.clone()).unwrap_or_default()));
    let icon = window.with_untracked(|w| w.as_ref().map(|w| w.app_id.icon()).unwrap_or_default());

    let style = move || {
        let Some(win) = window.get() else {
            return "display:none;".to_string();
        };
        let taskbar_height = state.with_untracked(|s| s.config.taskbar_height);
        let rect = effective_rect(&win, desktop_viewport(), taskbar_height);
        format!(
            "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};{}",
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            win.z_index,
            if win.minimized { "display:none;" } else { "" },
        )
    };
    let class = move || {
        format!(
            "desktop-window{}{}",
            if is_active.get() { " focused" } else { "" },
            if maximized.get() { " maximized" } else { "" },
        )
    };

    let focus = move |_| {
        if !is_active.get_untracked() {
            runtime.dispatch_action(DesktopAction::FocusWindow { window_id });
        }
    };
    let minimize = move || runtime.dispatch_action(DesktopAction::MinimizeWindow { window_id });
    let toggle_maximize = move || runtime.dispatch_action(DesktopAction::ToggleMaximize { window_id });
    let close = move || runtime.dispatch_action(DesktopAction::CloseWindow { window_id });
    let begin_move = move |ev: web_sys::PointerEvent| {
        if !is_primary_press(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        runtime.dispatch_action(DesktopAction::BeginMove {
            window_id,
            pointer: pointer_from_pointer_event(&ev),
        });
    };
    let titlebar_double_click = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        toggle_maximize();
    };

    view! {
        <section
            class=class
            style=style
            on:pointerdown=focus
            role="dialog"
            aria-label=move || title.get()
        >
            <header class="titlebar" on:pointerdown=begin_move on:dblclick=titlebar_double_click>
                <div class="titlebar-title">
                    <span class="titlebar-app-icon" data-icon=icon aria-hidden="true"></span>
                    <span>{title}</span>
                </div>
                <div class="titlebar-controls">
                    <TitlebarButton label="Minimize window" glyph="\u{2013}" on_press=minimize />
                    <TitlebarButton
                        label=Signal::derive(move || {
                            if maximized.get() { "Restore window" } else { "Maximize window" }
                        })
                        glyph=Signal::derive(move || if maximized.get() { "\u{2750}" } else { "\u{25A1}" })
                        on_press=toggle_maximize
                    />
                    <TitlebarButton label="Close window" glyph="\u{2715}" on_press=close />
                </div>
            </header>
            <div class="window-body">
                <WindowBody window_id=window_id />
            </div>
            <Show when=move || !maximized.get() fallback=|| ()>
                {ResizeEdge::ALL
                    .into_iter()
                    .map(|edge| view! { <WindowResizeHandle window_id=window_id edge=edge /> })
                    .collect_view()}
            </Show>
        </section>
    }
}

#[component]
fn TitlebarButton(
    #[prop(into)] label: MaybeSignal<&'static str>,
    #[prop(into)] glyph: MaybeSignal<&'static str>,
    on_press: impl Fn() + Copy + 'static,
) -> impl IntoView {
    view! {
        <button
            type="button"
            aria-label=move || label.get()
            on:pointerdown=move |ev: web_sys::PointerEvent| {
                ev.prevent_default();
                ev.stop_propagation();
            }
            on:mousedown=move |ev| stop_mouse_event(&ev)
            on:click=move |ev| {
                stop_mouse_event(&ev);
                on_press();
            }
        >
            {move || glyph.get()}
        </button>
    }
}

#[component]
fn WindowResizeHandle(window_id: WindowId, edge: ResizeEdge) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let class_name = format!("window-resize-handle {}", resize_edge_class(edge));

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if !is_primary_press(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::FocusWindow { window_id });
        runtime.dispatch_action(DesktopAction::BeginResize {
            window_id,
            edge,
            pointer: pointer_from_pointer_event(&ev),
        });
    };

    view! { <div class=class_name aria-hidden="true" on:pointerdown=on_pointerdown /> }
}

#[component]
fn WindowBody(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let payload = create_memo(move |_| {
        state.with(|s| s.window(window_id).and_then(|w| w.payload.clone()))
    });
    let lifetime = runtime
        .app_runtime
        .try_update_value(|apps| apps.ensure_lifetime(window_id))
        .unwrap_or_default();

    let contents = state
        .with_untracked(|s| {
            s.window(window_id)
                .map(|w| (w.app_id, s.user_name.clone().unwrap_or_default()))
        })
        .map(|(app_id, user_name)| {
            apps::app_module(app_id).mount(AppMountContext {
                app_id,
                window_id: window_id.0,
                user_name,
                payload: payload.into(),
                lifetime,
                services: runtime.app_services(window_id),
                timing: runtime.app_timing(),
            })
        })
        .unwrap_or_else(|| ().into_view());

    view! { <div class="window-body-content">{contents}</div> }
}

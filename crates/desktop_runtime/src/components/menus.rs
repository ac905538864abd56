use super::*;
use crate::chrome::{start_menu_tiles, welcome_heading, StartMenuTile};

#[component]
pub(super) fn StartMenu() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let heading = move || {
        runtime
            .state
            .with(|s| welcome_heading(s.user_name.as_deref().unwrap_or_default()))
    };

    view! {
        <div
            id="desktop-launcher-menu"
            class="start-menu"
            role="menu"
            aria-label="Start"
            on:mousedown=move |ev| ev.stop_propagation()
        >
            <h2 class="start-menu-heading">{heading}</h2>
            <div class="start-menu-grid">
                {start_menu_tiles()
                    .into_iter()
                    .map(|tile| {
                        let launch = move |_| {
                            if let StartMenuTile::App(app_id) = tile {
                                runtime.dispatch_action(DesktopAction::OpenApp { app_id, payload: None });
                            }
                        };
                        view! {
                            <button
                                type="button"
                                role="menuitem"
                                class="start-menu-tile"
                                data-icon=tile.icon()
                                disabled=matches!(tile, StartMenuTile::Placeholder(_))
                                on:click=launch
                            >
                                <span class="start-menu-tile-glyph" aria-hidden="true"></span>
                                <span>{tile.label()}</span>
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="start-menu-footer">
                <span class="start-menu-user">
                    {move || runtime.state.with(|s| s.user_name.clone().unwrap_or_default())}
                </span>
                <button
                    type="button"
                    role="menuitem"
                    class="start-menu-power"
                    on:click=move |_| runtime.dispatch_action(DesktopAction::LogOff)
                >
                    "Sign out"
                </button>
            </div>
        </div>
    }
}

#[component]
pub(super) fn QuickSettingsPanel() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let settings = create_memo(move |_| runtime.state.with(|s| s.quick_settings.clone()));
    let percent = |ev: &ev::Event| event_target_value(ev).parse::<i32>().ok();

    view! {
        <div
            class="quick-settings"
            role="dialog"
            aria-label="Quick settings"
            on:mousedown=move |ev| ev.stop_propagation()
        >
            <div class="quick-settings-toggles">
                <button
                    type="button"
                    class=move || {
                        if settings.with(|s| s.wifi_enabled) { "quick-toggle active" } else { "quick-toggle" }
                    }
                    aria-pressed=move || settings.with(|s| s.wifi_enabled).to_string()
                    on:click=move |_| runtime.dispatch_action(DesktopAction::ToggleWifi)
                >
                    <span>"Wi-Fi"</span>
                    <span class="quick-toggle-detail">
                        {move || settings.with(|s| if s.wifi_enabled { s.network.clone() } else { "Off".to_string() })}
                    </span>
                </button>
            </div>
            <label class="quick-slider">
                <span>"Brightness"</span>
                <input
                    type="range"
                    min="0"
                    max="100"
                    prop:value=move || settings.with(|s| s.brightness.to_string())
                    on:input=move |ev| {
                        if let Some(value) = percent(&ev) {
                            runtime.dispatch_action(DesktopAction::SetBrightness(value));
                        }
                    }
                />
            </label>
            <label class="quick-slider">
                <span>"Volume"</span>
                <input
                    type="range"
                    min="0"
                    max="100"
                    prop:value=move || settings.with(|s| s.volume.to_string())
                    on:input=move |ev| {
                        if let Some(value) = percent(&ev) {
                            runtime.dispatch_action(DesktopAction::SetVolume(value));
                        }
                    }
                />
            </label>
        </div>
    }
}

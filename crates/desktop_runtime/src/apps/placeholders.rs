//! Stub windows for apps whose content lives outside the simulation.

use desktop_app_contract::{AppMountContext, AppPayload};
use leptos::ev::SubmitEvent;
use leptos::*;

/// Page the browser opens when no URL is supplied.
pub const BROWSER_HOME: &str = "https://www.bing.com";

/// Prefixes `https://` unless the address already names a scheme. Blank input goes home.
pub fn normalize_browser_url(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        return BROWSER_HOME.to_string();
    }
    if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{input}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Settings sidebar pages.
pub enum SettingsCategory {
    #[default]
    /// Display and power.
    System,
    /// Background and colours.
    Personalization,
    /// Wi-Fi and network.
    Network,
    /// Output devices.
    Sound,
    /// Device information.
    About,
}

impl SettingsCategory {
    /// Every page in sidebar order.
    pub const ALL: [Self; 5] = [
        Self::System,
        Self::Personalization,
        Self::Network,
        Self::Sound,
        Self::About,
    ];

    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::Personalization => "Personalization",
            Self::Network => "Network & internet",
            Self::Sound => "Sound",
            Self::About => "About",
        }
    }

    fn token(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Personalization => "personalization",
            Self::Network => "network",
            Self::Sound => "sound",
            Self::About => "about",
        }
    }
}

/// Page selected by a window payload; unknown tags fall back to [`SettingsCategory::System`].
pub fn settings_category(payload: Option<&AppPayload>) -> SettingsCategory {
    match payload {
        Some(AppPayload::SettingsCategory(tag)) => SettingsCategory::ALL
            .into_iter()
            .find(|category| category.token().eq_ignore_ascii_case(tag.trim()))
            .unwrap_or_default(),
        _ => SettingsCategory::default(),
    }
}

pub(super) fn mount_settings(context: AppMountContext) -> View {
    let payload = context.payload;
    let active = create_rw_signal(settings_category(payload.get_untracked().as_ref()));
    create_effect(move |previous: Option<()>| {
        let category = payload.with(|payload| settings_category(payload.as_ref()));
        if previous.is_some() {
            active.set(category);
        }
    });

    view! {
        <div class="app-shell app-settings-shell">
            <nav class="settings-sidebar" aria-label="Settings categories">
                {SettingsCategory::ALL
                    .into_iter()
                    .map(|category| {
                        view! {
                            <button
                                type="button"
                                class=move || {
                                    if active.get() == category { "settings-nav active" } else { "settings-nav" }
                                }
                                on:click=move |_| active.set(category)
                            >
                                {category.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>
            <section class="settings-page">
                <h2>{move || active.get().label()}</h2>
                <p>{format!("Signed in as {}", context.user_name)}</p>
            </section>
        </div>
    }
    .into_view()
}

pub(super) fn mount_browser(context: AppMountContext) -> View {
    let payload = context.payload;
    let initial = payload
        .get_untracked()
        .as_ref()
        .and_then(AppPayload::url)
        .map(normalize_browser_url)
        .unwrap_or_else(|| BROWSER_HOME.to_string());
    let address = create_rw_signal(initial.clone());
    let frame_url = create_rw_signal(initial);

    create_effect(move |previous: Option<()>| {
        let url = payload.with(|payload| payload.as_ref().and_then(AppPayload::url).map(normalize_browser_url));
        if let (Some(_), Some(url)) = (previous, url) {
            address.set(url.clone());
            frame_url.set(url);
        }
    });

    let navigate = move |ev: SubmitEvent| {
        ev.prevent_default();
        let url = normalize_browser_url(&address.get_untracked());
        address.set(url.clone());
        frame_url.set(url);
    };

    view! {
        <div class="app-shell app-browser-shell">
            <form class="app-toolbar" on:submit=navigate>
                <button
                    type="button"
                    aria-label="Home"
                    on:click=move |_| {
                        address.set(BROWSER_HOME.to_string());
                        frame_url.set(BROWSER_HOME.to_string());
                    }
                >
                    "Home"
                </button>
                <input
                    class="app-field browser-address"
                    type="text"
                    aria-label="Address"
                    prop:value=move || address.get()
                    on:input=move |ev| address.set(event_target_value(&ev))
                />
            </form>
            <iframe class="browser-frame" title="Browser" src=move || frame_url.get()></iframe>
        </div>
    }
    .into_view()
}

pub(super) fn mount_calculator(_: AppMountContext) -> View {
    view! {
        <div class="app-shell app-calculator-shell">
            <div class="calculator-display" aria-live="polite">"0"</div>
            <div class="calculator-keys" role="group" aria-label="Calculator keys">
                {["7", "8", "9", "/", "4", "5", "6", "*", "1", "2", "3", "-", "0", ".", "=", "+"]
                    .into_iter()
                    .map(|key| view! { <button type="button" class="app-action">{key}</button> })
                    .collect_view()}
            </div>
        </div>
    }
    .into_view()
}

pub(super) fn mount_weather(_: AppMountContext) -> View {
    view! {
        <div class="app-shell app-weather-shell">
            <p class="weather-temp">"72°F"</p>
            <p>"Partly cloudy"</p>
        </div>
    }
    .into_view()
}

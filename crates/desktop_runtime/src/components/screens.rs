use std::time::Duration;

use super::*;
use crate::{
    chrome::{lock_screen_lines, welcome_heading},
    model::LOGIN_ACCOUNTS,
};

#[component]
pub(super) fn LoginScreen() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let now = create_rw_signal(local_now());

    if let Ok(interval) = set_interval_with_handle(move || now.set(local_now()), Duration::from_secs(1)) {
        on_cleanup(move || interval.clear());
    }

    view! {
        <div class="login-screen" role="main">
            <div class="login-clock">
                {move || {
                    let (time, date) = lock_screen_lines(now.get());
                    view! {
                        <p class="login-time">{time}</p>
                        <p class="login-date">{date}</p>
                    }
                }}
            </div>
            <div class="login-accounts" role="group" aria-label="Accounts">
                {LOGIN_ACCOUNTS
                    .into_iter()
                    .map(|account| {
                        view! {
                            <button
                                type="button"
                                class="login-account"
                                on:click=move |_| {
                                    runtime.dispatch_action(DesktopAction::LogIn {
                                        user_name: account.to_string(),
                                    })
                                }
                            >
                                <span class="login-avatar" aria-hidden="true"></span>
                                <span>{account}</span>
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

#[component]
pub(super) fn WelcomeScreen() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let heading = runtime
        .state
        .with_untracked(|s| welcome_heading(s.user_name.as_deref().unwrap_or_default()));

    view! {
        <div class="welcome-screen" role="status" aria-live="polite">
            <div class="welcome-spinner" aria-hidden="true"></div>
            <h1>{heading}</h1>
        </div>
    }
}

use std::rc::Rc;

use desktop_runtime::{
    load_desktop_config_or_default, use_desktop_runtime, DesktopAction, DesktopProvider,
    DesktopShell,
};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use platform_host::{ChatService, NoopChatService};

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Windows 11 Simulation" />
        <Meta name="description" content="A simulated desktop with a terminal, explorer, and editors." />

        <Router>
            <main class="site-root">
                <Routes>
                    <Route path="" view=DesktopEntry />
                    <Route path="/*any" view=DesktopEntry />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
pub fn DesktopEntry() -> impl IntoView {
    let chat: Rc<dyn ChatService> = Rc::new(NoopChatService);

    view! {
        <DesktopProvider chat=chat>
            <StoredConfigLoader />
            <DesktopShell />
        </DesktopProvider>
    }
}

/// Applies the desktop config saved in localStorage once the provider is mounted.
#[component]
fn StoredConfigLoader() -> impl IntoView {
    let runtime = use_desktop_runtime();
    spawn_local(async move {
        let store = platform_host_web::prefs_store();
        let config = load_desktop_config_or_default(&store).await;
        runtime.dispatch_action(DesktopAction::ApplyConfig(config));
    });
}

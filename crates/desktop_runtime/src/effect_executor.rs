//! Explicit runtime effect-queue executor for reducer-emitted side effects.

use leptos::*;

use crate::{
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

/// Installs the effect executor that drains reducer-emitted runtime effects in order.
pub fn install(runtime: DesktopRuntimeContext) {
    // Clear the queue before running so nested dispatches enqueue a fresh batch.
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        for effect in queued {
            run_runtime_effect(runtime, effect);
        }

        runtime.state.with_untracked(|state| {
            runtime.app_runtime.update_value(|apps| apps.sync(&state.windows));
        });
    });
}

fn run_runtime_effect(runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
    match effect {
        RuntimeEffect::WindowOpened(window_id) => {
            runtime
                .app_runtime
                .update_value(|apps| {
                    apps.ensure_lifetime(window_id);
                });
        }
        RuntimeEffect::WindowClosed(window_id) => {
            runtime
                .app_runtime
                .update_value(|apps| {
                    apps.end_window(window_id);
                });
        }
        RuntimeEffect::SessionEnded => {
            runtime.app_runtime.update_value(|apps| apps.end_all());
            logging::log!("desktop session ended");
        }
        RuntimeEffect::ScheduleWelcomeEnd => {
            let delay = runtime.state.with_untracked(|state| state.config.welcome_delay());
            set_timeout(
                move || runtime.dispatch_action(DesktopAction::FinishWelcome),
                delay,
            );
        }
    }
}

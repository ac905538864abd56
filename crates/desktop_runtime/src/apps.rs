//! App registry: maps each [`AppId`] to the module that renders its window body.

mod placeholders;

use desktop_app_contract::{AppId, AppModule};
use desktop_app_copilot::mount_copilot;
use desktop_app_explorer::mount_explorer;
use desktop_app_notepad::{mount_notepad, mount_word};
use desktop_app_terminal::mount_terminal;

pub use placeholders::{normalize_browser_url, settings_category, SettingsCategory, BROWSER_HOME};

/// Returns the mount module for `app_id`.
pub fn app_module(app_id: AppId) -> AppModule {
    match app_id {
        AppId::Explorer => AppModule::new(mount_explorer),
        AppId::Notepad => AppModule::new(mount_notepad),
        AppId::Word => AppModule::new(mount_word),
        AppId::Terminal => AppModule::new(mount_terminal),
        AppId::Copilot => AppModule::new(mount_copilot),
        AppId::Settings => AppModule::new(placeholders::mount_settings),
        AppId::Calculator => AppModule::new(placeholders::mount_calculator),
        AppId::Browser => AppModule::new(placeholders::mount_browser),
        AppId::Weather => AppModule::new(placeholders::mount_weather),
        AppId::TaskManager => AppModule::new(crate::components::mount_task_manager),
    }
}

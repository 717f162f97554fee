use crate::config::{Settings, resolve_config_path};

/// Settings for this run. A missing, unreadable or invalid config file never
/// keeps the wall closed; it is reported on stderr and defaults are used.
pub fn load_settings() -> Settings {
    let loaded = Settings::load()
        .map_err(|e| format!("failed to load config: {e}"))
        .and_then(|s| {
            s.validate()
                .map(|()| s)
                .map_err(|msg| format!("invalid config: {msg}"))
        });

    loaded.unwrap_or_else(|reason| {
        let path = resolve_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string());
        eprintln!("tagwall: {reason} ({path}), using defaults");
        Settings::default()
    })
}

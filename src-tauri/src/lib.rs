#[cfg(feature = "desktop")]
mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod widget;

#[cfg(feature = "desktop")]
pub fn run() {
    use commands::upload::WidgetState;
    use config::WidgetConfig;
    use services::analyze_client::HttpAnalyzeClient;
    use tauri::Manager;

    logging::init_logging();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_window_state::Builder::default().build())
        .setup(|app| {
            let app_data_dir = app.path().app_data_dir()?;
            if !app_data_dir.exists() {
                std::fs::create_dir_all(&app_data_dir)?;
            }

            if !app_data_dir.join(config::CONFIG_FILE).exists() {
                if let Err(e) = WidgetConfig::default().save(&app_data_dir) {
                    tracing::warn!(error = %e, "could not write default config");
                }
            }
            let config = WidgetConfig::load(&app_data_dir)?;
            tracing::info!(endpoint = %config.endpoint, "analysis endpoint configured");

            app.manage(HttpAnalyzeClient::new(config.endpoint));
            app.manage(WidgetState::new());
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::upload::drag_over,
            commands::upload::drag_leave,
            commands::upload::drop_paths,
            commands::upload::drop_zone_click,
            commands::upload::input_change,
            commands::upload::pick_file,
            commands::upload::remove_file,
            commands::upload::analyze,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

//! Browser client for LeaveDesk: runtime configuration, the REST API client,
//! HTTP-backed workflow stores and the reactive session state views bind to.

pub mod api;
pub mod app;
pub mod config;
pub mod repository;
pub mod state;
pub mod utils;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Starting LeaveDesk frontend (wasm)");

    leptos::spawn_local(async move {
        let config = config::load().await;
        let services = app::AppServices::new(api::ApiClient::new(), &config);
        let restored = services.sessions().current();
        match restored {
            Some(session) => log::info!("restored session for {}", session.principal.identity),
            None => log::info!("no active session"),
        }
    });
}

use crate::config::{self, AppConfig};
use leptos::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigState {
    pub config: AppConfig,
    pub loaded: bool,
}

pub fn use_config() -> (ReadSignal<ConfigState>, WriteSignal<ConfigState>) {
    match use_context::<(ReadSignal<ConfigState>, WriteSignal<ConfigState>)>() {
        Some(ctx) => ctx,
        None => {
            let (read, write) = create_signal(ConfigState {
                config: config::current(),
                loaded: false,
            });
            provide_context((read, write));
            (read, write)
        }
    }
}

/// Waits for the runtime config (page globals, then `config.json`).
pub async fn load_config(set_state: WriteSignal<ConfigState>) {
    let config = config::load().await;
    set_state.update(|s| {
        s.config = config;
        s.loaded = true;
    });
}

pub mod calendar;
pub mod category;
pub mod completions;
pub mod config;
pub mod habit;
pub mod timer;

use habitrack_core::{Config, Event, HabitStore, HttpHabitService};

use crate::Globals;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Config file plus environment and command-line overrides.
pub fn effective_config(globals: &Globals) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    if let Some(url) = &globals.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(id) = globals.user_id {
        config.user.id = id;
    }
    Ok(config)
}

/// Store bound to the configured backend, with categories and habits loaded.
pub async fn connect(
    globals: &Globals,
) -> Result<HabitStore<HttpHabitService>, Box<dyn std::error::Error>> {
    let config = effective_config(globals)?;
    let service = HttpHabitService::new(&config.api.base_url, config.timeout())?;
    let store = HabitStore::new(service, config.store_config());
    store.load_categories().await?;
    store.load().await?;
    Ok(store)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an event on one line, or a note when nothing changed.
pub fn print_event(event: Option<Event>) -> CmdResult {
    match event {
        Some(event) => println!("{}", serde_json::to_string(&event)?),
        None => eprintln!("nothing changed"),
    }
    Ok(())
}

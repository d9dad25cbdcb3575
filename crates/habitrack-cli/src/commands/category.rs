use clap::Subcommand;
use habitrack_core::category::slugify;
use habitrack_core::{CategoryRegistry, HabitStore, HttpHabitService};

use super::{effective_config, print_json, CmdResult};
use crate::Globals;

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List stock and backend categories
    List {
        /// Skip the backend and list only the local registry
        #[arg(long)]
        local: bool,
    },
    /// Print the slug a category name would get
    Slug { name: String },
}

pub async fn run(action: CategoryAction, globals: &Globals) -> CmdResult {
    match action {
        CategoryAction::List { local } => {
            let config = effective_config(globals)?;
            let registry = if local {
                if config.categories.seed_defaults {
                    CategoryRegistry::with_defaults()
                } else {
                    CategoryRegistry::new()
                }
            } else {
                let service = HttpHabitService::new(&config.api.base_url, config.timeout())?;
                let store = HabitStore::new(service, config.store_config());
                store.load_categories().await?;
                store.categories().await
            };
            let categories: Vec<_> = registry.iter().collect();
            print_json(&categories)?;
        }
        CategoryAction::Slug { name } => println!("{}", slugify(&name)),
    }
    Ok(())
}

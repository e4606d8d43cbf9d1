use chromodoro_core::store::{self, keys};
use chromodoro_core::Preferences;
use clap::Subcommand;

use crate::common::Ctx;

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print all preferences as JSON
    Show,
    /// Set a preference by field name
    Set { key: String, value: String },
}

pub fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Ctx::open()?;
    let store = ctx.store.as_ref();
    let mut prefs: Preferences = store::load_record(store, keys::PREFERENCES);

    match action {
        PrefsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        PrefsAction::Set { key, value } => {
            prefs.set(&key, &value)?;
            store::save_record(store, keys::PREFERENCES, &prefs);
            println!("{key} = {value}");
        }
    }
    Ok(())
}

use chromodoro_core::store::{self, keys};
use chromodoro_core::{Event, Preferences};
use chrono::Utc;

use crate::common::Ctx;

/// Apply the once-per-app-open streak advance. Callers (shell profiles,
/// desktop launchers) are expected to invoke this once per foreground,
/// not per command; a same-day repeat is a no-op anyway.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Ctx::open()?;
    let store = ctx.store.as_ref();
    let mut prefs: Preferences = store::load_record(store, keys::PREFERENCES);

    let days = prefs.update_streak(Utc::now());
    store::save_record(store, keys::PREFERENCES, &prefs);
    ctx.bus.publish(&Event::StreakUpdated {
        days,
        at: Utc::now(),
    });
    println!("daily streak: {days}");
    Ok(())
}

pub mod data;
pub mod focus;
pub mod game;
pub mod prefs;
pub mod stats;
pub mod streak;
pub mod task;

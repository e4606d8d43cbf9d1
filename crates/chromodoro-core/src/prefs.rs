//! User preference and lifetime statistic records.
//!
//! Both are plain value records persisted under their own store keys and
//! loaded once at startup. Unknown or missing fields fall back to
//! defaults so old records keep decoding after upgrades.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::streak;

/// Points awarded when a task is completed.
pub const POINTS_PER_TASK: u32 = 10;
/// Points awarded when a work session runs to completion.
pub const POINTS_PER_POMODORO: u32 = 5;

/// Application preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub has_completed_onboarding: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_work_secs")]
    pub work_duration_secs: u32,
    #[serde(default = "default_break_secs")]
    pub break_duration_secs: u32,
    #[serde(default)]
    pub daily_streak: u32,
    #[serde(default)]
    pub last_open_date: Option<DateTime<Utc>>,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_work_secs() -> u32 {
    1500
}
fn default_break_secs() -> u32 {
    300
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            has_completed_onboarding: false,
            notifications_enabled: true,
            sound_enabled: true,
            work_duration_secs: default_work_secs(),
            break_duration_secs: default_break_secs(),
            daily_streak: 0,
            last_open_date: None,
        }
    }
}

impl Preferences {
    /// Mark onboarding as done. Idempotent.
    pub fn complete_onboarding(&mut self) {
        self.has_completed_onboarding = true;
    }

    /// Apply the once-per-foreground streak advance and stamp the open date.
    /// Returns the updated streak.
    pub fn update_streak(&mut self, now: DateTime<Utc>) -> u32 {
        self.daily_streak = streak::advance(self.daily_streak, self.last_open_date, now);
        self.last_open_date = Some(now);
        self.daily_streak
    }

    /// Get a preference value as a string by field name.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a preference by field name, parsing the value to the field's type.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be
    /// parsed as the existing field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ValidationError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ValidationError::UnknownKey(key.to_string()))?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => {
                let parsed = value.parse::<bool>().map_err(|_| {
                    ValidationError::InvalidValue {
                        field: key.to_string(),
                        message: format!("cannot parse '{value}' as bool"),
                    }
                })?;
                serde_json::Value::Bool(parsed)
            }
            serde_json::Value::Number(_) => {
                let parsed = value.parse::<u64>().map_err(|_| {
                    ValidationError::InvalidValue {
                        field: key.to_string(),
                        message: format!("cannot parse '{value}' as number"),
                    }
                })?;
                serde_json::Value::Number(parsed.into())
            }
            serde_json::Value::Null | serde_json::Value::String(_) => {
                serde_json::Value::String(value.into())
            }
            _ => {
                return Err(ValidationError::InvalidValue {
                    field: key.to_string(),
                    message: "field cannot be set from the command line".into(),
                }
                .into())
            }
        };

        obj.insert(key.to_string(), new_value);
        *self = serde_json::from_value(json)?;
        Ok(())
    }
}

/// Lifetime counters across all features.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub total_tasks_completed: u32,
    #[serde(default)]
    pub total_pomodoros_completed: u32,
    #[serde(default)]
    pub total_games_played: u32,
    #[serde(default)]
    pub total_points: u32,
}

impl UserStats {
    pub fn record_task_completed(&mut self) {
        self.total_tasks_completed += 1;
        self.total_points += POINTS_PER_TASK;
    }

    pub fn record_pomodoro_completed(&mut self) {
        self.total_pomodoros_completed += 1;
        self.total_points += POINTS_PER_POMODORO;
    }

    pub fn record_game_played(&mut self) {
        self.total_games_played += 1;
    }
}

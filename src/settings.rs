use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::analytics::AnalyticsConfig;
use crate::priority::PriorityConfig;
use crate::scheduler::{parse_exam_date, SchedulerConfig};
use crate::spaced_review::ReviewConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSettings {
    /// Exam date exactly as the user entered it.
    pub exam_date: Option<String>,
    pub priority: PriorityConfig,
    pub scheduler: SchedulerConfig,
    pub analytics: AnalyticsConfig,
    pub review: ReviewConfig,
}

impl UserSettings {
    /// Parsed exam date; unparseable input counts as no date.
    pub fn exam_date(&self) -> Option<NaiveDate> {
        self.exam_date.as_deref().and_then(parse_exam_date)
    }

    /// Reset tuning values that would break plan, review or analytics math.
    pub fn sanitized(self) -> Self {
        Self {
            scheduler: self.scheduler.sanitized(),
            analytics: self.analytics.sanitized(),
            review: self.review.sanitized(),
            ..self
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str::<UserSettings>(&contents)
                .map(UserSettings::sanitized)
                .unwrap_or_else(|err| {
                    warn!("Settings at {} are invalid ({err}); using defaults", path.display());
                    UserSettings::default()
                })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn snapshot(&self) -> UserSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update_exam_date(&self, exam_date: Option<String>) -> Result<()> {
        self.update(|settings| settings.exam_date = exam_date)
    }

    fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut UserSettings),
    {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        apply(&mut *guard);
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

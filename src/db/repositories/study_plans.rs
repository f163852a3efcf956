use anyhow::{Context, Result};
use rusqlite::params;

use crate::db::Database;
use crate::models::StudyPlan;

impl Database {
    /// Store `plan` as the current plan, replacing any earlier one.
    pub fn save_study_plan(&self, plan: &StudyPlan) -> Result<()> {
        let serialized = serde_json::to_string(plan).context("failed to serialize study plan")?;
        let generated_at = plan.generated_at.to_rfc3339();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM study_plans", [])?;
            tx.execute(
                "INSERT INTO study_plans (generated_at, plan_json) VALUES (?1, ?2)",
                params![generated_at, serialized],
            )
            .with_context(|| "failed to insert study plan")?;
            tx.commit()?;
            Ok(())
        })
    }

    pub fn latest_study_plan(&self) -> Result<Option<StudyPlan>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT plan_json FROM study_plans ORDER BY id DESC LIMIT 1",
            )?;
            let mut rows = stmt.query([])?;
            let json: Option<String> = match rows.next()? {
                Some(row) => Some(row.get(0)?),
                None => None,
            };

            match json {
                Some(json) => {
                    let plan = serde_json::from_str(&json).context("stored study plan is corrupt")?;
                    Ok(Some(plan))
                }
                None => Ok(None),
            }
        })
    }
}

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::{
    helpers::{
        parse_bank, parse_cognitive_level, parse_confidence, parse_datetime, parse_difficulty,
        parse_error_type, parse_optional_datetime,
    },
    Database,
};
use crate::log_warn;
use crate::models::{ErrorRecord, ExternalSource};

const ENABLE_LOGS: bool = true;

const SELECT_COLUMNS: &str = "id, timestamp, description, system, topic, error_type, confidence,
     cognitive_level, remediation, source_bank, source_difficulty, source_percent_correct,
     source_next_review";

fn row_to_record(row: &Row) -> Result<ErrorRecord> {
    let id: String = row.get("id")?;
    let timestamp: String = row.get("timestamp")?;
    let error_type: String = row.get("error_type")?;
    let confidence: String = row.get("confidence")?;
    let cognitive_level: Option<String> = row.get("cognitive_level")?;
    let remediation: String = row.get("remediation")?;
    let source_bank: Option<String> = row.get("source_bank")?;

    let source = match source_bank {
        Some(bank) => {
            let difficulty: Option<String> = row.get("source_difficulty")?;
            let next_review: Option<String> = row.get("source_next_review")?;
            Some(ExternalSource {
                bank: parse_bank(&bank)?,
                difficulty: parse_difficulty(difficulty)?,
                percent_correct: row.get("source_percent_correct")?,
                next_review: parse_optional_datetime(next_review, "source_next_review")?,
            })
        }
        None => None,
    };

    Ok(ErrorRecord {
        timestamp: parse_datetime(&timestamp, "timestamp")?,
        description: row.get("description")?,
        system: row.get("system")?,
        topic: row.get("topic")?,
        error_type: parse_error_type(&error_type)?,
        confidence: parse_confidence(&confidence)?,
        cognitive_level: parse_cognitive_level(cognitive_level)?,
        remediation: serde_json::from_str(&remediation)
            .with_context(|| format!("invalid remediation notes on record {id}"))?,
        source,
        id,
    })
}

impl Database {
    pub fn insert_error_record(&self, record: &ErrorRecord) -> Result<()> {
        record.validate()?;
        let record = record.clone();
        self.execute(move |conn| {
            let remediation = serde_json::to_string(&record.remediation)?;
            let source = record.source.as_ref();
            conn.execute(
                "INSERT INTO error_records (id, timestamp, description, system, topic, error_type,
                     confidence, cognitive_level, remediation, source_bank, source_difficulty,
                     source_percent_correct, source_next_review, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    record.id,
                    record.timestamp.to_rfc3339(),
                    record.description,
                    record.system,
                    record.topic,
                    record.error_type.as_str(),
                    record.confidence.as_str(),
                    record.cognitive_level.map(|level| level.as_str()),
                    remediation,
                    source.map(|s| s.bank.as_str()),
                    source.and_then(|s| s.difficulty).map(|d| d.as_str()),
                    source.and_then(|s| s.percent_correct),
                    source
                        .and_then(|s| s.next_review)
                        .map(|dt| dt.to_rfc3339()),
                    Utc::now().to_rfc3339(),
                ],
            )
            .with_context(|| "failed to insert error record")?;
            Ok(())
        })
    }

    /// All stored records, oldest first. Rows that no longer parse are skipped.
    pub fn list_error_records(&self) -> Result<Vec<ErrorRecord>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM error_records ORDER BY timestamp ASC, id ASC"
            ))?;

            let mut rows = stmt.query([])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                match row_to_record(row) {
                    Ok(record) => records.push(record),
                    Err(err) => log_warn!("Skipping unreadable error record: {err:#}"),
                }
            }

            Ok(records)
        })
    }

    pub fn get_error_record(&self, record_id: &str) -> Result<Option<ErrorRecord>> {
        let record_id = record_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM error_records WHERE id = ?1"
            ))?;
            let mut rows = stmt.query(params![record_id])?;
            let record = match rows.next()? {
                Some(row) => Some(row_to_record(row)?),
                None => None,
            };

            Ok(record)
        })
    }

    pub fn delete_error_record(&self, record_id: &str) -> Result<()> {
        let record_id = record_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "DELETE FROM error_records WHERE id = ?1",
                params![record_id],
            )?;
            if rows_affected == 0 {
                return Err(anyhow!("Error record {record_id} not found"));
            }
            Ok(())
        })
    }

    pub fn count_error_records(&self) -> Result<u64> {
        self.execute(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM error_records", [], |row| row.get(0))?;
            u64::try_from(count).map_err(|_| anyhow!("negative record count {count}"))
        })
    }
}

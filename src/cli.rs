use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use uuid::Uuid;

use crate::analytics::analyze_systems;
use crate::db::Database;
use crate::insights::aggregate_patterns;
use crate::models::{
    CognitiveLevel, Confidence, ErrorRecord, ErrorType, ExternalSource, QuestionBank,
};
use crate::pipeline::run_pipeline;
use crate::priority::calculate_all_priorities;
use crate::scheduler::parse_exam_date;
use crate::settings::SettingsStore;
use crate::spaced_review::calculate_spaced_review;

#[derive(Parser, Debug)]
#[command(name = "studyplan", version, about = "Turn logged exam mistakes into a study plan")]
pub struct Cli {
    /// Directory holding the database and settings
    #[arg(long, env = "STUDYPLAN_DATA_DIR", default_value = ".studyplan", global = true)]
    pub data_dir: PathBuf,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a missed question
    Log {
        #[arg(long)]
        system: String,

        #[arg(long)]
        topic: String,

        /// knowledge, reasoning, process, or time
        #[arg(long, value_parser = parse_error_type_arg)]
        error_type: ErrorType,

        /// veryLow, low, moderate, high (or legacy 1-4)
        #[arg(long, value_parser = parse_confidence_arg)]
        confidence: Confidence,

        #[arg(long, default_value = "")]
        description: String,

        /// firstOrder or higherOrder
        #[arg(long, value_parser = parse_cognitive_arg)]
        cognitive_level: Option<CognitiveLevel>,

        /// Remediation note; repeat for several
        #[arg(long = "note")]
        notes: Vec<String>,

        /// Question bank the item came from
        #[arg(long, value_parser = parse_bank_arg)]
        bank: Option<QuestionBank>,

        /// National percent correct for the item
        #[arg(long, requires = "bank")]
        percent_correct: Option<f64>,

        /// When the source platform will show the item again (RFC 3339)
        #[arg(long, requires = "bank")]
        next_review: Option<DateTime<Utc>>,
    },

    /// Delete a recorded error
    Delete { id: String },

    /// Show per-topic error patterns
    Patterns,

    /// Show per-system analytics
    Systems,

    /// Show ranked study priorities
    Priorities,

    /// Generate and save a study plan
    Plan {
        /// Exam date (YYYY-MM-DD); overrides the saved one for this run
        #[arg(long)]
        exam_date: Option<String>,

        /// Seed for ordering same-priority sessions
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the ideal review date for one error
    Review { id: String },

    /// Save the exam date, or `clear` to remove it
    ExamDate { date: String },
}

fn parse_error_type_arg(value: &str) -> Result<ErrorType, String> {
    ErrorType::parse(value).ok_or_else(|| format!("unknown error type '{value}'"))
}

fn parse_confidence_arg(value: &str) -> Result<Confidence, String> {
    if let Ok(level) = value.trim().parse::<i64>() {
        return Confidence::from_legacy_scale(level)
            .ok_or_else(|| format!("confidence {level} outside 1-4"));
    }
    Confidence::parse(value).ok_or_else(|| format!("unknown confidence '{value}'"))
}

fn parse_cognitive_arg(value: &str) -> Result<CognitiveLevel, String> {
    CognitiveLevel::parse(value).ok_or_else(|| format!("unknown cognitive level '{value}'"))
}

fn parse_bank_arg(value: &str) -> Result<QuestionBank, String> {
    QuestionBank::parse(value).ok_or_else(|| format!("unknown question bank '{value}'"))
}

pub(crate) struct AppState {
    pub(crate) db: Database,
    pub(crate) settings: SettingsStore,
}

impl AppState {
    pub(crate) fn open(data_dir: &std::path::Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        Ok(Self {
            db: Database::new(data_dir.join("studyplan.sqlite3"))?,
            settings: SettingsStore::new(data_dir.join("settings.json"))?,
        })
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn execute(cli: Cli) -> Result<()> {
    let state = AppState::open(&cli.data_dir)?;
    let settings = state.settings.snapshot();
    let now = Utc::now();

    match cli.command {
        Command::Log {
            system,
            topic,
            error_type,
            confidence,
            description,
            cognitive_level,
            notes,
            bank,
            percent_correct,
            next_review,
        } => {
            let record = ErrorRecord {
                id: Uuid::new_v4().to_string(),
                timestamp: now,
                description,
                system,
                topic,
                error_type,
                confidence,
                cognitive_level,
                remediation: notes,
                source: bank.map(|bank| ExternalSource {
                    bank,
                    difficulty: None,
                    percent_correct,
                    next_review,
                }),
            };
            state.db.insert_error_record(&record)?;
            if cli.json {
                print_json(&record)?;
            } else {
                println!("Logged {} ({} / {})", record.id, record.system, record.topic);
            }
        }
        Command::Delete { id } => {
            state.db.delete_error_record(&id)?;
            println!("Deleted {id}");
        }
        Command::Patterns => {
            let errors = state.db.list_error_records()?;
            let patterns = aggregate_patterns(&errors);
            if cli.json {
                return print_json(&patterns);
            }
            for p in &patterns {
                println!(
                    "{:>3}  {} / {}  (avg confidence {:.1}, last {})",
                    p.error_count,
                    p.system,
                    p.topic,
                    p.avg_confidence,
                    p.last_seen.format("%Y-%m-%d")
                );
            }
        }
        Command::Systems => {
            let errors = state.db.list_error_records()?;
            let breakdowns = analyze_systems(&errors, now, &settings.analytics);
            if cli.json {
                return print_json(&breakdowns);
            }
            for b in &breakdowns {
                println!(
                    "{:>3}  {:<36} {:>5.1}%  {}  (higher-order {:.0}%)",
                    b.total_errors,
                    b.name,
                    b.exam_weight_percent,
                    b.trend.as_str(),
                    b.cognitive.higher_order_percent
                );
            }
        }
        Command::Priorities => {
            let errors = state.db.list_error_records()?;
            let patterns = aggregate_patterns(&errors);
            let priorities = calculate_all_priorities(&patterns, &errors, now, &settings.priority);
            if cli.json {
                return print_json(&priorities);
            }
            for p in &priorities {
                println!(
                    "#{:<3} {:>5.1}  {:<8}  {} / {}  [{}]",
                    p.rank,
                    p.score,
                    p.urgency.as_str(),
                    p.system,
                    p.topic,
                    p.reason_chip
                );
            }
        }
        Command::Plan { exam_date, seed } => {
            let exam_date = match exam_date {
                Some(raw) => parse_exam_date(&raw),
                None => settings.exam_date(),
            };
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let errors = state.db.list_error_records()?;
            let output = run_pipeline(&errors, exam_date, now, &settings, &mut rng);
            state.db.save_study_plan(&output.plan)?;

            if cli.json {
                return print_json(&output.plan);
            }
            let plan = &output.plan;
            if let Some(days) = plan.days_until_exam {
                println!("Exam in {days} days");
            }
            println!(
                "{} topics, {} minutes total",
                plan.topic_count(),
                plan.total_minutes()
            );
            for day in 1..=settings.scheduler.plan_days {
                let mut blocks = plan.blocks_for_day(day).peekable();
                if blocks.peek().is_none() {
                    continue;
                }
                println!("Day {day}");
                for block in blocks {
                    println!(
                        "  {:>3} min  {:<9} {} ({})  {}",
                        block.duration_minutes,
                        block.activity.as_str(),
                        block.topic,
                        block.why_scheduled,
                        block.reasoning
                    );
                }
            }
        }
        Command::Review { id } => {
            let Some(record) = state.db.get_error_record(&id)? else {
                bail!("Error record {id} not found");
            };
            let review = calculate_spaced_review(&record, now, &settings.review);
            if cli.json {
                return print_json(&review);
            }
            println!("{}: {}", review.review_at.format("%Y-%m-%d %H:%M"), review.reason);
        }
        Command::ExamDate { date } => {
            if date.eq_ignore_ascii_case("clear") {
                state.settings.update_exam_date(None)?;
                println!("Exam date cleared");
            } else {
                let Some(parsed) = parse_exam_date(&date) else {
                    bail!("Could not read '{date}' as a date (expected YYYY-MM-DD)");
                };
                state.settings.update_exam_date(Some(parsed.to_string()))?;
                println!("Exam date set to {parsed}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_log_command() {
        let cli = Cli::try_parse_from([
            "studyplan",
            "log",
            "--system",
            "Renal",
            "--topic",
            "Aldosterone",
            "--error-type",
            "knowledge",
            "--confidence",
            "2",
        ])
        .unwrap();
        match cli.command {
            Command::Log {
                error_type,
                confidence,
                ..
            } => {
                assert_eq!(error_type, ErrorType::Knowledge);
                assert_eq!(confidence, Confidence::Low);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_error_type_rejected() {
        let result = Cli::try_parse_from([
            "studyplan",
            "log",
            "--system",
            "Renal",
            "--topic",
            "GFR",
            "--error-type",
            "careless",
            "--confidence",
            "low",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_plan_and_exam_date_flow() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_path_buf();
        let run = |args: &[&str]| {
            let mut argv = vec!["studyplan", "--data-dir", data_dir.to_str().unwrap()];
            argv.extend_from_slice(args);
            execute(Cli::try_parse_from(argv).unwrap())
        };

        run(&[
            "log", "--system", "Cardiovascular", "--topic", "Preload", "--error-type", "knowledge",
            "--confidence", "low",
        ])
        .unwrap();
        run(&["exam-date", "2099-01-01"]).unwrap();
        assert!(run(&["exam-date", "whenever"]).is_err());
        run(&["plan", "--seed", "1"]).unwrap();

        let state = AppState::open(&data_dir).unwrap();
        let plan = state.db.latest_study_plan().unwrap().unwrap();
        assert!(!plan.blocks.is_empty());
        assert!(plan.days_until_exam.unwrap() > 90);
    }
}

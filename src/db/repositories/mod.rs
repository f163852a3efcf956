mod error_records;
mod study_plans;

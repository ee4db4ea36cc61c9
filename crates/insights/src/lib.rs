//! Human-readable outputs derived from graph `Stats`: rule-based insights,
//! the weekly digest, chat snapshot text and user anonymization.

pub mod anonymize;
pub mod digest;
pub mod rules;

pub use anonymize::Anonymizer;
pub use digest::{build_weekly_digest, insights_text, snapshot_text, WeeklyDigest};
pub use rules::{assess_insights, generate_insights, InsightMeta, RuleBasedInsight};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use orgpulse_compute::{build_graph_with, GraphReport};
use orgpulse_core::{AdminConfig, AnalyticsConfig, Config, InteractionEvent};
use orgpulse_ingest::{
    filter_events, load_events, parse_webhook, save_events, seed_scenario, EventRepository,
    InMemoryEventStore,
};
use orgpulse_insights::{
    build_weekly_digest, generate_insights, insights_text, snapshot_text, Anonymizer,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::cli::{CliArgs, Command};

const SNAPSHOT_TITLE: &str = "Workplace Social Graph Snapshot";

/// Settings for one invocation: env config with command-line overrides applied.
pub struct RunContext {
    pub admin: AdminConfig,
    pub analytics: AnalyticsConfig,
    pub events_path: PathBuf,
    pub now: DateTime<Utc>,
}

impl RunContext {
    pub fn new(args: &CliArgs, config: Config, now: DateTime<Utc>) -> Self {
        let mut admin = config.admin;
        admin.anonymize_users |= args.anonymize;

        let mut analytics = config.analytics;
        if args.seed.is_some() {
            analytics.community_seed = args.seed;
        }

        Self {
            admin,
            analytics,
            events_path: args.events.clone().unwrap_or(config.events_path),
            now,
        }
    }

    /// Snapshot events with retention and ignored channels applied.
    fn load(&self) -> Result<Vec<InteractionEvent>> {
        let events = load_events(&self.events_path).with_context(|| {
            format!("failed to load events from {}", self.events_path.display())
        })?;
        Ok(filter_events(&events, &self.admin, self.now))
    }

    fn report(&self, events: &[InteractionEvent]) -> (GraphReport, Option<Anonymizer>) {
        let report = build_graph_with(events, &self.analytics);
        let anonymizer = self
            .admin
            .anonymize_users
            .then(|| Anonymizer::for_report(&report));
        (report, anonymizer)
    }

    pub fn analyze(&self, events: &[InteractionEvent]) -> Value {
        let (report, anonymizer) = self.report(events);
        let report = match anonymizer {
            Some(anon) => anon.report(&report),
            None => report,
        };
        json!({
            "graph": { "nodes": report.nodes, "edges": report.edges },
            "stats": report.stats,
        })
    }

    pub fn insights(&self, events: &[InteractionEvent]) -> Value {
        let (report, anonymizer) = self.report(events);
        let mut stats = report.stats;
        let mut insight = generate_insights(&stats);
        if let Some(anon) = anonymizer {
            stats = anon.stats(&stats);
            insight = anon.insight(&insight);
        }
        json!({
            "generatedAt": self.now.to_rfc3339(),
            "stats": stats,
            "insights": { "ruleBased": insight },
        })
    }

    pub fn digest(&self, events: &[InteractionEvent]) -> Value {
        let (report, anonymizer) = self.report(events);
        let insight = generate_insights(&report.stats);
        let mut digest = build_weekly_digest(&report.stats, &insight);
        if let Some(anon) = anonymizer {
            digest = anon.digest(&digest);
        }
        json!({
            "generatedAt": self.now.to_rfc3339(),
            "digest": digest,
        })
    }

    pub fn snapshot(&self, events: &[InteractionEvent]) -> Value {
        let (report, anonymizer) = self.report(events);
        let insight = generate_insights(&report.stats);
        let (mut text, mut bullets) = (
            snapshot_text(&report.stats, &insight),
            insights_text(&insight),
        );
        if let Some(anon) = anonymizer {
            text = anon.text(&text);
            bullets = anon.text(&bullets);
        }
        json!({
            "title": SNAPSHOT_TITLE,
            "text": text,
            "insights": bullets,
        })
    }

    pub fn demo(&self, scenario: &str, save: bool) -> Result<Value> {
        let mut rng = match self.analytics.community_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let seed = seed_scenario(scenario, &mut rng, self.now)?;

        if save {
            save_events(&self.events_path, &seed.events).with_context(|| {
                format!("failed to save events to {}", self.events_path.display())
            })?;
        }

        let events = filter_events(&seed.events, &self.admin, self.now);
        Ok(json!({
            "seed": seed,
            "messageCount": seed.message_count(),
            "saved": save,
            "analysis": self.analyze(&events),
        }))
    }

    /// Normalize payloads into the snapshot file, merging reactions into
    /// messages already stored there.
    pub fn ingest(&self, payloads_path: &Path) -> Result<Value> {
        let raw = std::fs::read_to_string(payloads_path)
            .with_context(|| format!("failed to read {}", payloads_path.display()))?;
        let payloads: Value = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not valid JSON", payloads_path.display()))?;
        let payloads = match payloads {
            Value::Array(items) => items,
            single => vec![single],
        };

        let store = if self.events_path.exists() {
            let existing = load_events(&self.events_path).with_context(|| {
                format!("failed to load events from {}", self.events_path.display())
            })?;
            InMemoryEventStore::with_events(existing)
        } else {
            InMemoryEventStore::new()
        };
        let before = store.len();

        let (mut accepted, mut rejected) = (0usize, 0usize);
        for (i, payload) in payloads.iter().enumerate() {
            match parse_webhook(payload) {
                Ok(event) => {
                    store.record(event);
                    accepted += 1;
                }
                Err(rejection) => {
                    warn!(index = i, %rejection, "payload rejected");
                    rejected += 1;
                }
            }
        }

        save_events(&self.events_path, &store.snapshot()).with_context(|| {
            format!("failed to save events to {}", self.events_path.display())
        })?;
        info!(accepted, rejected, stored = store.len(), "webhook payloads ingested");

        Ok(json!({
            "accepted": accepted,
            "rejected": rejected,
            "added": store.len() - before,
            "stored": store.len(),
        }))
    }
}

/// Run the selected subcommand and return its JSON output.
pub fn run(args: &CliArgs, config: Config, now: DateTime<Utc>) -> Result<Value> {
    let ctx = RunContext::new(args, config, now);
    match &args.command {
        Command::Analyze => Ok(ctx.analyze(&ctx.load()?)),
        Command::Insights => Ok(ctx.insights(&ctx.load()?)),
        Command::Digest => Ok(ctx.digest(&ctx.load()?)),
        Command::Snapshot => Ok(ctx.snapshot(&ctx.load()?)),
        Command::Demo { scenario, save } => ctx.demo(scenario, *save),
        Command::Ingest { payloads } => ctx.ingest(payloads),
    }
}

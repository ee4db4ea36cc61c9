//! Event intake: webhook normalization, admin filtering, storage, file
//! loading and synthetic demo data.

pub mod demo;
pub mod filter;
pub mod load;
pub mod normalize;
pub mod store;

pub use demo::{available_scenarios, seed_scenario, DemoSeed};
pub use filter::{apply_retention, extract_user_ids, filter_events, filter_ignored_channels, RetentionOutcome};
pub use load::{load_events, save_events};
pub use normalize::{normalize_webhook, parse_webhook, WebhookRejection};
pub use store::{EventRepository, InMemoryEventStore};

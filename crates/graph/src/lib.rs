pub mod adjacency;
pub mod store;

pub use adjacency::Adjacency;
pub use store::{Edge, GraphBuilder, InteractionGraph, MENTION_WEIGHT, REACTION_WEIGHT, REPLY_WEIGHT};

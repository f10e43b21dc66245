pub mod evaluator;
pub mod normalize;

pub use evaluator::{evaluate, MatchFacts, Outcome};
pub use normalize::normalize_market_key;

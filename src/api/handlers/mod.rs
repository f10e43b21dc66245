pub mod bets;
pub mod health;
pub mod metrics;
pub mod resolver;

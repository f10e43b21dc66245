pub mod audit;
pub mod resolver;

pub mod bet;
pub mod lock;
pub mod run;

pub use bet::{Bet, BetStatus};
pub use lock::ResolutionLock;
pub use run::ResolutionRun;

pub mod account;
pub mod market;
pub mod progress;

pub use account::{Account, BadgeAward, Position};
pub use market::{MarketCapTier, Quote, StockListing};
pub use progress::{AwardKind, ProgressMetric, QuestDef};

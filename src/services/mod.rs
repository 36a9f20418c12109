pub mod analytics;
pub mod farms;
pub mod ownership;

pub use analytics::{summary_for, AnalyticsSummary};
pub use farms::{delete_farm, FarmRemoval};
pub use ownership::OwnedCrud;

mod distribution;
mod outcome;
mod records;
mod results;

pub use distribution::{Distribution, PROBABILITY_TOLERANCE};
pub use outcome::{Outcome, OutcomeTable, TierPool};
pub use records::{StepEvent, StepRecord, StepReport};
pub use results::{BatchSummary, PercentileSet, RunSummary};

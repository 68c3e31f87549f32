//! Integration tests for the stakesim simulation engine
//!
//! Tests are organized by topic:
//! - `consumption` - Pay-per-attempt runs, fees and insufficient funds
//! - `growth` - Deposits, compounding and appreciation
//! - `random_walk` - Price walk and the final sale
//! - `batch` - Seeded batches and their summaries
//! - `scenarios` - Built-in scenarios end to end

mod consumption;
mod growth;

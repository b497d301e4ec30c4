pub mod halving;
pub mod miner;
pub mod range;
pub mod result;
pub mod series;

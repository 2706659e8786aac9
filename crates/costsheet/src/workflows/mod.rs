pub mod catalog;
pub mod costing;
pub mod export;

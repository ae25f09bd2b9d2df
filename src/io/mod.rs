/// CSV export of ranked results.
pub mod export;

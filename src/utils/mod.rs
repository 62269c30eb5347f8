pub mod data;
pub mod enrich;
pub mod ev_calculator;
pub mod query;

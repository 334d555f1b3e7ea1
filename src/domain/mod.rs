// Domain layer - pure types and functions over asset records
pub mod aggregation;
pub mod asset;
pub mod dashboard;
pub mod filter;
pub mod marker;
pub mod series;

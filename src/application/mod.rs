// Application layer - Use cases over the asset dataset
pub mod asset_repository;
pub mod dashboard_service;
pub mod dataset_service;
pub mod normalizer;

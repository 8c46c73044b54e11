// Application layer - Use cases and the analytics behind them
pub mod dashboard_service;
pub mod insights;
pub mod mock_data;
pub mod photo_service;
pub mod property_service;
pub mod recognition;
pub mod report_repository;
pub mod report_service;
pub mod statistics;

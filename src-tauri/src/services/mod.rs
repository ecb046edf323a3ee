pub mod analyze_client;
pub mod preview_service;

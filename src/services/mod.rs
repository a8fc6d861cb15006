pub mod chart_service;
pub mod history_service;
pub mod resample_service;
pub mod sample_service;

pub mod calculation_service;
pub mod prediction_service;
pub mod validation_service;

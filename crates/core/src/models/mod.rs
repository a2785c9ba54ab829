pub mod allocation;
pub mod asset;
pub mod portfolio;
pub mod prediction;
pub mod result;
pub mod settings;

pub mod dto;
pub mod series_service;
pub mod simulator;

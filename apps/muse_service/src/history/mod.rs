pub mod history_controller;
pub mod history_service;

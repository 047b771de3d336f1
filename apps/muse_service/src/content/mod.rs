pub mod content_controller;
pub mod content_service;

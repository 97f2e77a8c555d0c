pub mod intake_service;
pub mod notification_service;

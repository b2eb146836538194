pub mod error;
pub mod expiry_job;
pub mod lifecycle;
pub mod notification_service;
pub mod plan_seed;
pub mod subscription_service;

pub mod db;
pub mod memberdb;
pub mod notificationdb;
pub mod plandb;
pub mod subscriptiondb;

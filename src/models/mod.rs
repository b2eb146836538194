pub mod notificationmodels;
pub mod planmodels;
pub mod subscriptionmodels;

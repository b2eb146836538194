pub mod plandtos;
pub mod subscriptiondtos;

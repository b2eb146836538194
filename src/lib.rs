pub mod config;
pub mod db;
pub mod dtos;
pub mod models;
pub mod service;
pub mod utils;

use std::sync::Arc;

use config::Config;
use db::db::DBClient;
use service::{
    expiry_job::ExpiryNotificationJob,
    notification_service::{NotificationSender, NotificationService},
    subscription_service::SubscriptionService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    // Services
    pub subscription_service: Arc<SubscriptionService<DBClient>>,
    pub notification_service: Arc<NotificationService<DBClient>>,
    pub expiry_job: Arc<ExpiryNotificationJob<DBClient>>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config, sender: Arc<dyn NotificationSender>) -> Self {
        let db_client_arc = Arc::new(db_client);

        let subscription_service = Arc::new(SubscriptionService::new(db_client_arc.clone()));
        let notification_service = NotificationService::new(db_client_arc.clone(), sender);
        let expiry_job = Arc::new(ExpiryNotificationJob::new(
            db_client_arc.clone(),
            notification_service.clone(),
            config.notification_concurrency,
        ));

        Self {
            env: config,
            db_client: db_client_arc,
            subscription_service,
            notification_service: Arc::new(notification_service),
            expiry_job,
        }
    }
}

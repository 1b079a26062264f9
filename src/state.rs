use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::OrmConn,
    middleware::session::SessionKeys,
    payment::{PaymentProvider, stripe::StripeProvider},
};

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionKeys>,
    pub payments: Option<Arc<dyn PaymentProvider>>,
}

impl AppState {
    pub fn new(orm: OrmConn, config: AppConfig) -> Self {
        let payments = StripeProvider::from_config(&config.payment)
            .map(|provider| Arc::new(provider) as Arc<dyn PaymentProvider>);
        let sessions = Arc::new(SessionKeys::new(
            &config.session.secret,
            config.secure_cookies(),
        ));
        Self {
            orm,
            config: Arc::new(config),
            sessions,
            payments,
        }
    }

    pub fn with_payment_provider(mut self, provider: Arc<dyn PaymentProvider>) -> Self {
        self.payments = Some(provider);
        self
    }

    pub fn currency(&self) -> &str {
        &self.config.payment.currency
    }
}

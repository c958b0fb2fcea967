use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::accounts;
use crate::accounts::repo::{AccountStore, PgAccountStore};
use crate::accounts::service::AccountService;
use crate::config::AppConfig;
use crate::notify::{AmqpQueue, NotificationQueue};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountService>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let queue = Arc::new(
            AmqpQueue::connect(&config.amqp_url, &[config.welcome_queue.as_str()])
                .await
                .context("connect to amqp broker")?,
        ) as Arc<dyn NotificationQueue>;

        let store = Arc::new(PgAccountStore::new(db.clone())) as Arc<dyn AccountStore>;
        let accounts = accounts::service::new(
            store,
            queue,
            config.welcome_queue.clone(),
            config.hash_cost,
        );

        Ok(Self {
            db,
            config,
            accounts,
        })
    }
}

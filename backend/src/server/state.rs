//! Wiring of ports, services and the mail worker from settings.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{info, warn};

use backend::domain::ports::Mailer;
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::mail::LogMailer;
use backend::outbound::memory::MemoryStore;
use backend::outbound::persistence::{
    DbPool, DieselDeliveryProblemRepository, DieselDeliveryRepository,
    DieselDeliverymanRepository, DieselRecipientRepository, DieselUserRepository,
    run_pending_migrations,
};
use backend::outbound::queue::{ChannelMailQueue, MailWorker};
use backend::outbound::security::BcryptPasswordHasher;
use backend::settings::AppSettings;

/// Build the HTTP state and start the mail worker.
///
/// With a database URL the pending migrations are applied and the Diesel
/// repositories are used; otherwise every repository is backed by one
/// [`MemoryStore`].
///
/// # Errors
/// Returns [`io::Error`] when migrations fail or the pool cannot be built.
pub(crate) async fn build_http_state(settings: &AppSettings) -> io::Result<web::Data<HttpState>> {
    let (queue, receiver) = ChannelMailQueue::new(settings.queue_capacity());
    let mailer: Arc<dyn Mailer> = Arc::new(
        settings
            .mail_from()
            .map_or_else(LogMailer::default, LogMailer::new),
    );
    tokio::spawn(MailWorker::new(mailer, settings.retry_policy()).run(receiver));

    let hasher = Arc::new(BcryptPasswordHasher::new(settings.bcrypt_cost));
    let mail_queue = Arc::new(queue);
    let clock = Arc::new(DefaultClock);

    let ports = match settings.database_url() {
        Some(url) => {
            let applied = run_pending_migrations(url)
                .await
                .map_err(|err| io::Error::other(format!("database migration failed: {err}")))?;
            info!(applied, "database schema up to date");
            let pool = DbPool::new(settings.pool_config(url))
                .await
                .map_err(|err| io::Error::other(format!("database pool failed: {err}")))?;
            HttpStatePorts {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                deliverymen: Arc::new(DieselDeliverymanRepository::new(pool.clone())),
                recipients: Arc::new(DieselRecipientRepository::new(pool.clone())),
                deliveries: Arc::new(DieselDeliveryRepository::new(pool.clone())),
                problems: Arc::new(DieselDeliveryProblemRepository::new(pool)),
                hasher,
                mail_queue,
                clock,
            }
        }
        None => {
            warn!("no database configured; data is kept in memory");
            let store = Arc::new(MemoryStore::default());
            HttpStatePorts {
                users: store.clone(),
                deliverymen: store.clone(),
                recipients: store.clone(),
                deliveries: store.clone(),
                problems: store,
                hasher,
                mail_queue,
                clock,
            }
        }
    };

    Ok(web::Data::new(HttpState::new(ports)))
}

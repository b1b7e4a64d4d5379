use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use topup_engine::{events::EventProducers, JsonFileDatabase, LinkApi, OrderFlowApi};

use crate::{
    bot::{start_bot_worker, AdminPolicy, CommandHandler},
    config::ServerConfig,
    errors::ServerError,
    integrations::notifier::{create_notifier_event_handlers, Notifier},
    routes::{health, PackagesRoute, PurchaseRoute, RedeemRoute},
    telegram::TelegramClient,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = JsonFileDatabase::open(&config.data_dir, config.corruption_policy)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🚀️ Data files are in {}", config.data_dir.display());
    let notifier =
        Notifier::from_config(&config.telegram).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = create_notifier_event_handlers(notifier);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    match &config.telegram.bot_token {
        Some(token) => {
            let client = TelegramClient::new(token.clone(), config.telegram.poll_timeout)
                .map_err(|e| ServerError::InitializeError(e.to_string()))?;
            let policy = AdminPolicy::new(config.telegram.admin_id);
            let handler = CommandHandler::new(db.clone(), producers.clone(), policy, &config.public_base_url);
            // The worker runs for the lifetime of the process
            let _bot = start_bot_worker(client, handler, config.telegram.poll_timeout);
        },
        None => info!("🚀️ Telegram bot not configured. Skipping polling."),
    }
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: JsonFileDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let links_api = LinkApi::new(db.clone());
        let orders_api = OrderFlowApi::new(db.clone(), producers.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("topup::access_log"))
            .app_data(web::Data::new(links_api))
            .app_data(web::Data::new(orders_api))
            .service(health)
            .service(PackagesRoute::<JsonFileDatabase>::new())
            .service(RedeemRoute::<JsonFileDatabase>::new())
            .service(PurchaseRoute::<JsonFileDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

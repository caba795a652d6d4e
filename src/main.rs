use rusty_caddy::args;
use rusty_caddy::caddy::CaddyService;
use rusty_caddy::controller::advice::configure;
use rusty_caddy::storage::{MemoryStore, SqliteStore, TendencyStore};

use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = match args::args_checks() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = init_store(args.db_name.as_deref());
    let service = CaddyService::new(store, args.caddy_config());

    info!(
        host = %args.host,
        port = args.port,
        store_timeout_ms = args.store_timeout.as_millis(),
        free_advice_limit = args.free_advice_limit,
        "starting caddy server"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(service.clone()))
            .configure(configure)
    })
    .bind((args.host.as_str(), args.port))?
    .run()
    .await?;
    Ok(())
}

fn init_store(db_name: Option<&str>) -> Arc<dyn TendencyStore> {
    match db_name {
        Some(path) => match SqliteStore::open(path) {
            Ok(store) => {
                info!(path, "using sqlite tendency store");
                Arc::new(store)
            }
            Err(e) => {
                error!(path, error = %e, "could not open sqlite store");
                std::process::exit(1);
            }
        },
        None => {
            info!("no database configured, using in-memory tendency store");
            Arc::new(MemoryStore::new())
        }
    }
}

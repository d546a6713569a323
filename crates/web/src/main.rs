use std::process;

use database::{DatabaseConnectionInfo, PgDatabase};
use web::{config::WebConfig, start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let web_config = WebConfig::from_env().unwrap_or_else(|why| {
        log::error!("invalid web configuration: {}", why);
        process::exit(1);
    });

    // database
    let database_connection_info = DatabaseConnectionInfo::from_env().unwrap_or_else(|why| {
        log::error!("invalid database configuration: {}", why);
        process::exit(1);
    });
    let database = match PgDatabase::connect(database_connection_info).await {
        Ok(database) => database,
        Err(why) => {
            log::error!("could not set up database: {}", why);
            process::exit(1);
        }
    };

    // web server
    if let Err(why) = start_web_server(web_config, WebState::new(database)).await {
        log::error!("web server stopped: {}", why);
        process::exit(1);
    }
}

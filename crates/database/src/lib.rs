use std::{env, error::Error};

use map_markers::database::Database;
use sqlx::{Connection as _, Executor as _, PgConnection};

pub mod data_model;
pub mod queries;

/// Database the bootstrap connects to while the target database may not exist yet.
const MAINTENANCE_DATABASE: &str = "postgres";

/// Postgres error code raised when `CREATE DATABASE` loses a race.
const DUPLICATE_DATABASE: &str = "42P04";

#[derive(Debug, Clone)]
pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    /// Reads `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_PORT` and `DB_NAME`.
    /// Unset variables fall back to a local development database.
    pub fn from_env() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let var = |name: &str, default: &str| {
            env::var(name).unwrap_or_else(|_| default.to_owned())
        };
        let port = var("DB_PORT", "5432");
        let port: u16 = port
            .parse()
            .map_err(|why| format!("DB_PORT {:?} is not a valid port: {}", port, why))?;
        Ok(Self {
            username: var("DB_USER", "postgres"),
            password: var("DB_PASSWORD", "postgres"),
            hostname: var("DB_HOST", "localhost"),
            port,
            database: var("DB_NAME", "map_markers"),
        })
    }

    pub(crate) fn postgres_url(&self) -> String {
        self.postgres_url_for(&self.database)
    }

    fn postgres_url_for(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, database
        )
    }
}

#[derive(Debug, Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

#[derive(Debug)]
pub struct PgDatabaseAutocommit {
    pool: sqlx::PgPool,
}

impl PgDatabase {
    /// Connects to the database, creating it first if needed, and applies all
    /// pending migrations. Migrations run under an advisory lock, so several
    /// processes may start at once.
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> Result<Self, Box<dyn Error>> {
        ensure_database_exists(&database_connection_info).await?;

        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!(
            "database {} at {}:{} is ready",
            database_connection_info.database,
            database_connection_info.hostname,
            database_connection_info.port
        );

        Ok(Self { connection: pool })
    }
}

impl Database for PgDatabase {
    type Autocommit = PgDatabaseAutocommit;

    fn auto(&self) -> Self::Autocommit {
        PgDatabaseAutocommit {
            pool: self.connection.clone(),
        }
    }
}

async fn ensure_database_exists(
    database_connection_info: &DatabaseConnectionInfo,
) -> Result<(), sqlx::Error> {
    let name = &database_connection_info.database;
    let mut connection = PgConnection::connect(
        &database_connection_info.postgres_url_for(MAINTENANCE_DATABASE),
    )
    .await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1);")
            .bind(name)
            .fetch_one(&mut connection)
            .await?;

    if !exists {
        log::info!("database {} does not exist, creating it", name);
        let statement = format!("CREATE DATABASE {};", quote_identifier(name));
        match connection.execute(statement.as_str()).await {
            Ok(_) => {}
            Err(sqlx::Error::Database(why))
                if why.code().as_deref() == Some(DUPLICATE_DATABASE) =>
            {
                log::info!("database {} was created by another process", name);
            }
            Err(why) => return Err(why),
        }
    }

    connection.close().await
}

/// Quotes an identifier for use in statements that do not accept bind parameters.
fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

//! scheme-persistence
//!
//! Implementación SQLite (Diesel) del contrato `SchemeRepository` de
//! scheme-core, más utilidades de conexión y migraciones. El objetivo es
//! paridad observable 1:1 con el backend in-memory del core.
//!
//! Módulos:
//! - `sqlite`: repositorio sobre SQLite (pool r2d2, retry, mapeo de filas).
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: carga de configuración desde .env.
//! - `schema`: tablas Diesel declaradas para compilar queries.

pub mod config;
pub mod error;
pub mod migrations;
pub mod schema;
pub mod sqlite;

pub use config::init_dotenv;
pub use error::PersistenceError;
pub use sqlite::{build_dev_pool_from_env, build_pool, ConnectionProvider, PoolProvider, SqlitePool,
                 SqliteSchemeRepository};

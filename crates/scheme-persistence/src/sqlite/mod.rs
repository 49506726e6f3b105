//! Implementación SQLite (Diesel) del contrato `SchemeRepository`.
//!
//! Objetivo del módulo:
//! - Proveer persistencia durable con paridad observable 1:1 respecto al
//!   backend in-memory del core.
//! - Aislar el mapeo dominio ↔ filas de DB dentro de este crate.
//!
//! Detalles de implementación:
//! - Cada operación es una query (o una secuencia de dos: escritura + la
//!   relectura confirmatoria). No hay transacción que abarque el par
//!   write/read-back; solo el insert comparte transacción con el
//!   `last_insert_rowid()` que recupera el id asignado.
//! - Manejo de errores transitorios: reintento con backoff ante
//!   SQLITE_BUSY/locked y fallos de pool.
//! - Pragmas por checkout: `busy_timeout` y `foreign_keys` (la cascada
//!   schemes -> steps depende de FKs activas).

use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use log::{debug, warn};

use scheme_core::{NewScheme, NewStep, Scheme, SchemeChanges, SchemeRepository, StepView, StoreError};

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::{schemes, steps};

/// Alias de tipo para el pool r2d2 de conexiones SQLite.
///
/// Notas operativas:
/// - Se construye con `min_idle` y `max_size`; al construirlo se corre el set
///   de migraciones pendientes (una sola vez).
/// - Con `:memory:` cada conexión tiene su propia base: usar pool 1x1.
pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar un pool real (producción/tests de integración) o
/// factorear en tests unitarios sin acoplar a r2d2. Debe devolver una
/// conexión lista para ejecutar consultas Diesel, ya con pragmas aplicados.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<SqliteConnection>>, PersistenceError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un
/// `SqlitePool`.
pub struct PoolProvider {
    pub pool: SqlitePool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<SqliteConnection>>, PersistenceError> {
        let mut conn = self.pool
                           .get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))?;
        configure_connection(&mut conn)?;
        Ok(conn)
    }
}

/// Pragmas por conexión: contención (busy_timeout) y FKs activas.
fn configure_connection(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    diesel::sql_query("PRAGMA busy_timeout = 5000").execute(conn)?;
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(conn)?;
    Ok(())
}

/// Fila mapeada de la tabla `schemes` para lecturas.
#[derive(Queryable, Debug)]
pub struct SchemeRow {
    pub id: i32,
    pub scheme_name: String,
    pub created_at: chrono::NaiveDateTime,
}

fn scheme_from_row(row: SchemeRow) -> Scheme {
    Scheme { id: row.id, scheme_name: row.scheme_name, created_at: row.created_at }
}

/// Estructura para inserción en `schemes` (`id` y `created_at` los pone la
/// base).
#[derive(Insertable, Debug)]
#[diesel(table_name = schemes)]
pub struct NewSchemeRow<'a> {
    pub scheme_name: &'a str,
}

/// Changeset parcial de `schemes`: campos `None` no se tocan.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = schemes)]
pub struct SchemeChangeset<'a> {
    pub scheme_name: Option<&'a str>,
}

/// Estructura para inserción en `steps`. `scheme_id` viene siempre del
/// parámetro de `add_step`, nunca del payload.
#[derive(Insertable, Debug)]
#[diesel(table_name = steps)]
pub struct NewStepRow<'a> {
    pub scheme_id: i32,
    pub step_number: i32,
    pub instructions: &'a str,
}

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    id: i32,
}

/// Determina si un error es transitorio (recomendado reintentar con backoff).
fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::Busy(_) => true,
        PersistenceError::TransientIo(_) => true,
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("database is locked") || m.contains("database table is locked") || m.contains("timeout")
        }
        _ => false,
    }
}

/// Retry simple con backoff muy pequeño (hasta 3 intentos: 15/30/45 ms).
/// No altera semántica de negocio; solo repite la unidad de trabajo `f`.
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms",
                      attempts + 1,
                      e,
                      delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// Repositorio de schemes sobre SQLite.
///
/// Fachada sin estado (solo guarda el provider); cada llamada se resuelve de
/// forma independiente contra el pool.
pub struct SqliteSchemeRepository<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> SqliteSchemeRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl SqliteSchemeRepository<PoolProvider> {
    /// Atajo para el caso común: repositorio directamente sobre un pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self::new(PoolProvider { pool })
    }
}

impl<P: ConnectionProvider> SchemeRepository for SqliteSchemeRepository<P> {
    fn find(&self) -> Result<Vec<Scheme>, StoreError> {
        debug!("find:start");
        let rows: Vec<SchemeRow> = with_retry(|| {
                                       let mut conn = self.provider.connection()?;
                                       schemes::table.order(schemes::id.asc())
                                                     .load(&mut conn)
                                                     .map_err(PersistenceError::from)
                                   })?;
        debug!("find:done count={}", rows.len());
        Ok(rows.into_iter().map(scheme_from_row).collect())
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Scheme>, StoreError> {
        debug!("find_by_id:start id={id}");
        // `.first()` + `.optional()`: ausencia es Ok(None); si hubiera más de
        // una fila solo se usa la primera
        let row: Option<SchemeRow> = with_retry(|| {
                                         let mut conn = self.provider.connection()?;
                                         schemes::table.filter(schemes::id.eq(id))
                                                       .first(&mut conn)
                                                       .optional()
                                                       .map_err(PersistenceError::from)
                                     })?;
        Ok(row.map(scheme_from_row))
    }

    fn find_steps(&self, scheme_id: i32) -> Result<Vec<StepView>, StoreError> {
        debug!("find_steps:start scheme_id={scheme_id}");
        // inner join schemes ⋈ steps proyectando scheme_name (no scheme_id);
        // orden explícito por step_number, con id como desempate estable
        let rows: Vec<(i32, String, i32, String)> =
            with_retry(|| {
                let mut conn = self.provider.connection()?;
                schemes::table.inner_join(steps::table)
                              .filter(schemes::id.eq(scheme_id))
                              .select((steps::id, schemes::scheme_name, steps::step_number, steps::instructions))
                              .order((steps::step_number.asc(), steps::id.asc()))
                              .load(&mut conn)
                              .map_err(PersistenceError::from)
            })?;
        debug!("find_steps:done scheme_id={scheme_id} count={}", rows.len());
        Ok(rows.into_iter()
               .map(|(id, scheme_name, step_number, instructions)| StepView { id,
                                                                              scheme_name,
                                                                              step_number,
                                                                              instructions })
               .collect())
    }

    fn add(&mut self, scheme: NewScheme) -> Result<Scheme, StoreError> {
        debug!("add:start scheme_name={}", scheme.scheme_name);
        let id: i32 = with_retry(|| {
                          let mut conn = self.provider.connection()?;
                          conn.transaction(|conn| {
                                  diesel::insert_into(schemes::table)
                                      .values(&NewSchemeRow { scheme_name: &scheme.scheme_name })
                                      .execute(conn)?;
                                  let id: i32 = diesel::sql_query("SELECT last_insert_rowid() AS id")
                                      .get_result::<LastInsertRowId>(conn)
                                      .map(|row| row.id)?;
                                  Ok::<i32, diesel::result::Error>(id)
                              })
                              .map_err(PersistenceError::from)
                      })?;
        debug!("add:done id={id}");
        // relectura separada: el caller observa defaults asignados por la base
        self.find_by_id(id)?
            .ok_or_else(|| StoreError::Internal(format!("scheme {id} not readable after insert")))
    }

    fn update(&mut self, changes: SchemeChanges, id: i32) -> Result<Option<Scheme>, StoreError> {
        debug!("update:start id={id}");
        // changeset vacío no es representable en Diesel; sin cambios la
        // operación degenera en la relectura
        if !changes.is_empty() {
            with_retry(|| {
                let mut conn = self.provider.connection()?;
                diesel::update(schemes::table.filter(schemes::id.eq(id)))
                    .set(&SchemeChangeset { scheme_name: changes.scheme_name.as_deref() })
                    .execute(&mut conn)
                    .map_err(PersistenceError::from)
            })?;
        }
        self.find_by_id(id)
    }

    fn remove(&mut self, id: i32) -> Result<Option<Scheme>, StoreError> {
        debug!("remove:start id={id}");
        // snapshot ANTES del delete: después la fila ya no es legible
        let snapshot = self.find_by_id(id)?;
        let affected = with_retry(|| {
                           let mut conn = self.provider.connection()?;
                           diesel::delete(schemes::table.filter(schemes::id.eq(id)))
                               .execute(&mut conn)
                               .map_err(PersistenceError::from)
                       })?;
        debug!("remove:done id={id} affected={affected}");
        Ok(if affected == 1 { snapshot } else { None })
    }

    fn add_step(&mut self, step: NewStep, scheme_id: i32) -> Result<Vec<StepView>, StoreError> {
        debug!("add_step:start scheme_id={scheme_id} step_number={}", step.step_number);
        // el parámetro explícito pisa cualquier scheme_id del payload
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::insert_into(steps::table)
                .values(&NewStepRow { scheme_id, step_number: step.step_number, instructions: &step.instructions })
                .execute(&mut conn)
                .map_err(PersistenceError::from)
        })?;
        self.find_steps(scheme_id)
    }
}

/// Construye un pool SQLite r2d2 a partir de la URL (ruta de archivo o
/// `:memory:`).
///
/// Comportamiento:
/// - Valida y ajusta tamaños (si `min_size > max_size`, usa `min = max`).
/// - Ejecuta migraciones inmediatamente tras el primer `get()`.
/// - Devuelve `PersistenceError::TransientIo` ante errores del pool/manager.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<SqlitePool, PersistenceError> {
    let validated_min = if min_size == 0 { 1 } else { min_size };
    let validated_max = if max_size == 0 { 1 } else { max_size };
    if validated_min > validated_max {
        warn!("min_size > max_size ({} > {}), ajustando min=max", validated_min, validated_max);
    }
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(final_min))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    // Migraciones una sola vez al construir (primer connection checkout).
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        configure_connection(&mut conn)?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Helper de desarrollo: carga `.env`, lee configuración (DATABASE_URL,
/// tamaños) y construye un pool ya migrado.
pub fn build_dev_pool_from_env() -> Result<SqlitePool, PersistenceError> {
    crate::config::init_dotenv();
    let cfg = crate::config::DbConfig::from_env();
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}

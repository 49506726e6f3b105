use scheme_persistence::{build_pool, SqlitePool};

/// Pool nuevo sobre una base `:memory:` ya migrada. 1x1 para que todas las
/// queries del test compartan la misma conexión (y por tanto la misma base).
pub fn fresh_pool() -> SqlitePool {
    build_pool(":memory:", 1, 1).expect("pool")
}

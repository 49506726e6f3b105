//! Errores observables del contrato (simples por ahora).
//!
//! Ausencia NO es error: `find_by_id`, `update` y `remove` la modelan como
//! `Ok(None)`. Aquí solo viven las condiciones fatales para la llamada.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StoreError {
    /// Fallo de conexión/pool o error transitorio agotados los reintentos.
    #[error("store unavailable: {0}")] Unavailable(String),
    /// Violación de constraint del store (input malformado llega aquí tal
    /// cual; esta capa no valida).
    #[error("constraint violation: {0}")] Constraint(String),
    #[error("internal: {0}")] Internal(String),
}

#[cfg(test)]
mod tests {
    use super::StoreError;

    #[test]
    fn display_formats() {
        let u = StoreError::Unavailable("pool down".into()).to_string();
        assert_eq!(u, "store unavailable: pool down");
        let c = StoreError::Constraint("FOREIGN KEY constraint failed".into()).to_string();
        assert!(c.starts_with("constraint violation"));
    }
}

//! Contrato de acceso a datos para schemes y sus steps.

pub mod memory;

pub use memory::InMemorySchemeRepository;

use crate::errors::StoreError;
use crate::model::{NewScheme, NewStep, Scheme, SchemeChanges, StepView};

/// Fachada sin estado sobre el store relacional.
///
/// Lecturas con `&self`, escrituras con `&mut self`. Ausencia se modela como
/// `Ok(None)` o secuencia vacía, nunca como error. Las escrituras siguen el
/// patrón write-then-read-back: dos llamadas al store separadas, sin
/// transacción entre ambas.
pub trait SchemeRepository {
    /// Todos los schemes en orden de inserción (id ascendente), sin steps.
    fn find(&self) -> Result<Vec<Scheme>, StoreError>;

    /// Un scheme por id; `Ok(None)` si no existe. Si el store devolviera más
    /// de una fila, solo se usa la primera.
    fn find_by_id(&self, id: i32) -> Result<Option<Scheme>, StoreError>;

    /// Steps del scheme (inner join con el padre), ordenados ascendente por
    /// `step_number`. Scheme inexistente o sin steps => secuencia vacía.
    fn find_steps(&self, scheme_id: i32) -> Result<Vec<StepView>, StoreError>;

    /// Inserta y relee por el id asignado: el caller observa los defaults
    /// que pone el store (p.ej. `created_at`).
    fn add(&mut self, scheme: NewScheme) -> Result<Scheme, StoreError>;

    /// Update parcial + relectura. Id inexistente => `Ok(None)`, sin error
    /// distinto para "no se actualizó nada".
    fn update(&mut self, changes: SchemeChanges, id: i32) -> Result<Option<Scheme>, StoreError>;

    /// Borra el scheme y devuelve el snapshot previo si el delete afectó
    /// exactamente una fila; `Ok(None)` si no afectó ninguna. El snapshot se
    /// lee ANTES del delete (después la fila ya no existe).
    fn remove(&mut self, id: i32) -> Result<Option<Scheme>, StoreError>;

    /// Inserta un step forzando `scheme_id` al parámetro (gana siempre sobre
    /// el payload) y devuelve la colección completa post-inserción,
    /// equivalente a `find_steps(scheme_id)`.
    fn add_step(&mut self, step: NewStep, scheme_id: i32) -> Result<Vec<StepView>, StoreError>;
}

//! Registros del dominio schemes/steps.
//!
//! Un `Scheme` es un procedimiento nombrado; sus `Step` llevan `step_number`
//! para definir el orden dentro del scheme (unicidad/contigüidad NO se
//! exigen en esta capa). `StepView` es la proyección del join padre-hijo:
//! incluye `scheme_name`, nunca el id del scheme.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    /// Clave sustituta asignada por el store al insertar.
    pub id: i32,
    pub scheme_name: String,
    /// Default del store (CURRENT_TIMESTAMP); el caller lo observa gracias a
    /// la relectura post-insert.
    pub created_at: NaiveDateTime,
}

/// Payload de alta de scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScheme {
    pub scheme_name: String,
}

impl NewScheme {
    pub fn new(scheme_name: impl Into<String>) -> Self {
        Self { scheme_name: scheme_name.into() }
    }
}

/// Cambios parciales de un scheme: los campos `None` no se tocan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeChanges {
    pub scheme_name: Option<String>,
}

impl SchemeChanges {
    /// Sin cambios: el update degenera en una relectura.
    pub fn is_empty(&self) -> bool {
        self.scheme_name.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: i32,
    pub scheme_id: i32,
    pub step_number: i32,
    pub instructions: String,
}

/// Payload de alta de step. Puede traer `scheme_id`, pero `add_step` siempre
/// lo pisa con el parámetro explícito.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStep {
    pub step_number: i32,
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme_id: Option<i32>,
}

impl NewStep {
    pub fn new(step_number: i32, instructions: impl Into<String>) -> Self {
        Self { step_number, instructions: instructions.into(), scheme_id: None }
    }
}

/// Fila proyectada del join schemes ⋈ steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepView {
    /// Id del step (no del scheme).
    pub id: i32,
    pub scheme_name: String,
    pub step_number: i32,
    pub instructions: String,
}

//! Implementación in-memory del repositorio.
//!
//! Rápida para tests y prototipos, y blanco de los parity checks contra el
//! backend SQLite: misma semántica observable, incluidas las constraints que
//! allí aplica la base (FK de `steps.scheme_id` y su cascada en delete).

use chrono::Utc;

use super::SchemeRepository;
use crate::errors::StoreError;
use crate::model::{NewScheme, NewStep, Scheme, SchemeChanges, Step, StepView};

pub struct InMemorySchemeRepository {
    schemes: Vec<Scheme>,
    steps: Vec<Step>,
    next_scheme_id: i32,
    next_step_id: i32,
}

impl Default for InMemorySchemeRepository {
    fn default() -> Self {
        Self { schemes: Vec::new(), steps: Vec::new(), next_scheme_id: 1, next_step_id: 1 }
    }
}

impl InMemorySchemeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchemeRepository for InMemorySchemeRepository {
    fn find(&self) -> Result<Vec<Scheme>, StoreError> {
        // el Vec ya está en orden de inserción (ids ascendentes)
        Ok(self.schemes.clone())
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Scheme>, StoreError> {
        Ok(self.schemes.iter().find(|s| s.id == id).cloned())
    }

    fn find_steps(&self, scheme_id: i32) -> Result<Vec<StepView>, StoreError> {
        let Some(scheme) = self.schemes.iter().find(|s| s.id == scheme_id) else {
            // inner join sin padre => secuencia vacía, no error
            return Ok(Vec::new());
        };
        let mut views: Vec<StepView> = self
            .steps
            .iter()
            .filter(|st| st.scheme_id == scheme_id)
            .map(|st| StepView { id: st.id,
                                 scheme_name: scheme.scheme_name.clone(),
                                 step_number: st.step_number,
                                 instructions: st.instructions.clone() })
            .collect();
        // sort estable: empates de step_number quedan en orden de inserción
        views.sort_by_key(|v| v.step_number);
        Ok(views)
    }

    fn add(&mut self, scheme: NewScheme) -> Result<Scheme, StoreError> {
        let id = self.next_scheme_id;
        self.next_scheme_id += 1;
        self.schemes.push(Scheme { id,
                                   scheme_name: scheme.scheme_name,
                                   created_at: Utc::now().naive_utc() });
        // relectura por id, misma forma que el backend SQL
        self.find_by_id(id)?
            .ok_or_else(|| StoreError::Internal(format!("scheme {id} not readable after insert")))
    }

    fn update(&mut self, changes: SchemeChanges, id: i32) -> Result<Option<Scheme>, StoreError> {
        if let Some(s) = self.schemes.iter_mut().find(|s| s.id == id) {
            if let Some(name) = changes.scheme_name {
                s.scheme_name = name;
            }
        }
        self.find_by_id(id)
    }

    fn remove(&mut self, id: i32) -> Result<Option<Scheme>, StoreError> {
        let snapshot = self.find_by_id(id)?;
        let before = self.schemes.len();
        self.schemes.retain(|s| s.id != id);
        if before - self.schemes.len() == 1 {
            // cascada: los steps se van con su scheme (FK ON DELETE CASCADE)
            self.steps.retain(|st| st.scheme_id != id);
            Ok(snapshot)
        } else {
            Ok(None)
        }
    }

    fn add_step(&mut self, step: NewStep, scheme_id: i32) -> Result<Vec<StepView>, StoreError> {
        // espejo de la FK del backend: scheme inexistente => constraint
        if !self.schemes.iter().any(|s| s.id == scheme_id) {
            return Err(StoreError::Constraint("FOREIGN KEY constraint failed".into()));
        }
        let id = self.next_step_id;
        self.next_step_id += 1;
        // el parámetro explícito pisa cualquier scheme_id del payload
        self.steps.push(Step { id, scheme_id, step_number: step.step_number, instructions: step.instructions });
        self.find_steps(scheme_id)
    }
}

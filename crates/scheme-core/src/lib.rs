//! scheme-core: contrato de acceso a datos para schemes y sus steps.
pub mod errors;
pub mod model;
pub mod repo;

pub use errors::StoreError;
pub use model::{NewScheme, NewStep, Scheme, SchemeChanges, Step, StepView};
pub use repo::{InMemorySchemeRepository, SchemeRepository};

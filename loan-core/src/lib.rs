pub mod calculations;
pub mod glossary;
pub mod models;
pub mod reference;

pub use calculations::CalculatorError;
pub use models::*;
pub use reference::{ReferenceRepository, RepositoryError};

//! Domain rules for the Holocron character/movie catalog.
//!
//! Pure logic only: identifiers, the error taxonomy, field validation for
//! both entity kinds and the batch id helpers that relationship validation
//! is built on. Persistence lives in `holocron-db`, HTTP in `holocron-api`.

pub mod character;
pub mod error;
pub mod movie;
pub mod relationship;
pub mod types;
pub mod validation;

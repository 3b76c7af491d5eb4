//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Reads take `&PgPool`; writes take any [`sqlx::PgExecutor`] so the store
//! can run them inside one transaction.

pub mod character_movie_repo;
pub mod character_repo;
pub mod movie_repo;

pub use character_movie_repo::{CharacterMovieRepo, LinkedCharacter, LinkedMovie};
pub use character_repo::CharacterRepo;
pub use movie_repo::MovieRepo;

//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A summary struct used when the entity is nested under the other side
//! - A detail struct pairing the entity with its related summaries
//! - `Deserialize` create / update DTOs (unknown fields rejected)
//! - A values struct holding the scalar columns an insert or update writes

pub mod character;
pub mod movie;

pub use character::{
    Character, CharacterDetail, CharacterSummary, CharacterValues, CreateCharacter,
    UpdateCharacter,
};
pub use movie::{CreateMovie, Movie, MovieDetail, MovieSummary, MovieValues, UpdateMovie};

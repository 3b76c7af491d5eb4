pub mod characters;
pub mod movies;

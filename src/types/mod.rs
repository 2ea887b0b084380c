//! Core data types for the joke service

pub mod joke;

pub use joke::{Joke, JokeId};

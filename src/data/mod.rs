mod loader;

pub use loader::{LoadError, load_pool_from_json, parse_pool};

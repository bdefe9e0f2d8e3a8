pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, LoadedData, load_catalog, load_recipes_file};

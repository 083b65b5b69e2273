pub mod json_store;
pub mod preference;
pub mod schema;

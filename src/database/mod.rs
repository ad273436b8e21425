// Sea-ORM backed data store for the list action

pub mod executor;

pub use executor::{SeaOrmExecutor, to_condition};

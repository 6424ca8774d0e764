pub mod city_store;
pub mod schema;

pub use city_store::{CityStore, QueryRow};

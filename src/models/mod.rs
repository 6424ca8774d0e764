pub mod city;
pub mod country;

pub use city::CityRecord;
pub use country::{value_to_text, CountryWithoutMegacity};

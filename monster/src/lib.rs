pub mod domain;
pub mod planes;
pub mod ports;

pub use domain::Movie;
pub use planes::data::MovieLookupService;

pub mod movie_operations;
pub mod operation;

pub use movie_operations::MovieLookupService;
pub use operation::MovieOperations;

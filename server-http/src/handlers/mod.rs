pub mod movie;
pub mod root;

pub use movie::lookup::get_movie;
pub use root::{root, GREETING};

mod images;
mod metadata;

pub use images::ImageClient;
pub use metadata::MetadataClient;

pub mod api_reader;
pub mod catalog;
pub mod site_reader;

pub use api_reader::{JsonFileSource, ObservationSource};
pub use catalog::{select_file_for_month, FileCatalog, TaggedFile};
pub use site_reader::SiteReader;

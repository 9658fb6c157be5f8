pub mod editor;
pub mod extractors;
pub mod manage;
pub mod overview;
pub mod resource;

pub use manage::{ActionOutcome, TablePage, ViewStore};
pub use resource::ResourceHandler;

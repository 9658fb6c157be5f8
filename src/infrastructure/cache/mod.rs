pub mod tag_cache;

pub use tag_cache::TagCache;

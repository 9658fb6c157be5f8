pub mod schema;
pub mod text;

pub use schema::{normalize, parse_payload, FieldKind, FieldSpec};
pub use text::{slugify, split_list, toggle_membership, Separator};

pub mod blog_post;
pub mod contact;
pub mod dashboard;
pub mod envelope;
pub mod project;
pub mod resource;
pub mod session;
pub mod skill;

pub use blog_post::BlogPost;
pub use contact::ContactMessage;
pub use envelope::Envelope;
pub use project::Project;
pub use resource::{ChangeKind, Editable, InvalidationPolicy, ListQuery, Resource, ResourceChanged, ResourceKind, Viewable};
pub use session::{AccessToken, AuthUser, RequestContext};
pub use skill::Skill;

pub mod project;
pub mod session;

pub use project::{
    Coordinates, Project, ProjectId, ProjectMetadata, ProjectPatch, ProjectStatus,
};
pub use session::{SessionContext, SessionPatch, ANONYMOUS_USER};

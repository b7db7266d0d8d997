//! Accreditation core: domain models, status labels, error taxonomy and
//! repository traits shared by every other crate in the workspace.

pub mod error;
pub mod models;
pub mod repository;
pub mod status;

pub use error::{AccreditError, AccreditResult, ConflictCode, ErrorKind};
pub use status::{ReviewStatus, StatusChange};

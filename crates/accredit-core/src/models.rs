//! Domain models for the accreditation workflow engine.
//!
//! Records reference each other by identifier. The only embedded copy is
//! the proposal snapshot carried by a [`conduct::ProposalConduct`].

pub mod accreditation;
pub mod adviser;
pub mod conduct;
pub mod document;
pub mod organization;
pub mod profile;
pub mod proposal;
pub mod roster;
pub mod user;

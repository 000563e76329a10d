//! Project aggregate
//!
//! `model` holds the stored record and its embedded sub-records; `patch`
//! holds the write models (drafts for creation, patches for shallow merges).

mod model;
mod patch;

pub use model::{Assignee, Owner, Project, ProjectUpdate, Requirement, Risk, TeamSlot};
pub use patch::{ProjectDraft, ProjectPatch, RequirementDraft, RequirementPatch};

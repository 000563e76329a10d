//! # pm-models
//!
//! Domain models for the PM dashboard.
//!
//! Every struct serializes with camelCase field names, which is the persisted
//! layout of the `projects` and `teamMembers` collections.

pub use pm_core::traits::{Entity, Id, Identifiable};

pub mod priority;
pub mod milestone;
pub mod project;
pub mod member;
pub mod seed;
mod validation;

pub use priority::Priority;
pub use milestone::{Milestone, MilestoneKey, MilestoneStatus, Milestones};
pub use project::{
    Assignee, Owner, Project, ProjectDraft, ProjectPatch, ProjectUpdate, Requirement,
    RequirementDraft, RequirementPatch, Risk, TeamSlot,
};
pub use member::{MemberDraft, MemberPatch, TeamMember};

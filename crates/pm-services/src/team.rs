//! Team roster
//!
//! Owns the `teamMembers` collection. An empty collection reads as the
//! default five-person roster, held in memory only until the first change
//! writes it out.

use std::collections::HashSet;
use std::sync::Arc;

use pm_core::clock::Clock;
use pm_core::error::{PmError, ValidationErrors};
use pm_core::result::{MutationResult, PmResult};
use pm_core::traits::{next_id, Id};
use pm_models::{seed, MemberDraft, MemberPatch, Project, TeamMember};
use pm_store::{Collection, PersistentStore, Storage};
use serde::Serialize;
use tracing::{info, instrument};

use crate::synced::SyncedCollection;

/// Roster summary shown above the member table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub total_members: usize,
    pub avg_workload: i32,
    pub avg_performance: i32,
    pub busy_members: usize,
}

impl TeamStats {
    pub fn from_members(members: &[TeamMember]) -> Self {
        let average = |value: fn(&TeamMember) -> i32| -> i32 {
            if members.is_empty() {
                return 0;
            }
            let sum: i64 = members.iter().map(|m| i64::from(value(m))).sum();
            (sum as f64 / members.len() as f64).round() as i32
        };
        Self {
            total_members: members.len(),
            avg_workload: average(|m| m.workload),
            avg_performance: average(|m| m.performance),
            busy_members: members.iter().filter(|m| m.is_busy()).count(),
        }
    }
}

pub struct TeamRoster<S: Storage> {
    members: SyncedCollection<S, TeamMember>,
    clock: Arc<dyn Clock>,
}

impl<S: Storage> TeamRoster<S> {
    pub fn new(store: Arc<PersistentStore<S>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            members: SyncedCollection::new(store, Collection::TeamMembers),
            clock,
        }
    }

    pub fn open(store: Arc<PersistentStore<S>>, clock: Arc<dyn Clock>) -> Self {
        let roster = Self::new(store, clock);
        roster.load();
        roster
    }

    pub fn load(&self) -> usize {
        let count = self.members.load_with(seed::default_team_members);
        info!(count, "Team roster loaded");
        count
    }

    pub fn is_loaded(&self) -> bool {
        self.members.is_loaded()
    }

    pub fn members(&self) -> Vec<TeamMember> {
        self.members.snapshot()
    }

    pub fn get_member(&self, id: Id) -> PmResult<TeamMember> {
        self.members.get(id)
    }

    pub fn stats(&self) -> TeamStats {
        self.members.read(TeamStats::from_members)
    }

    /// Projects a member is assigned to; ids with no matching project are skipped
    pub fn member_projects(&self, member: &TeamMember) -> Vec<Project> {
        let projects: Vec<Project> = self.members.store().get_collection(Collection::Projects);
        member
            .current_projects
            .iter()
            .filter_map(|id| projects.iter().find(|p| p.id == *id).cloned())
            .collect()
    }

    /// New members join today with no project assignments
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub fn add_member(&self, draft: MemberDraft) -> MutationResult<TeamMember> {
        draft.check()?;
        let join_date = self.clock.today();
        let applied = self.members.mutate(seed::default_team_members, |members| {
            let member = draft.into_member(next_id(members.iter())?, join_date);
            members.push(member.clone());
            Ok(member)
        })?;
        info!(id = applied.value.id, persisted = applied.is_persisted(), "Team member added");
        Ok(applied)
    }

    /// Shallow merge; `currentProjects` must name existing projects
    #[instrument(skip(self, patch))]
    pub fn update_member(&self, id: Id, patch: MemberPatch) -> MutationResult<TeamMember> {
        patch.check()?;
        if let Some(project_ids) = &patch.current_projects {
            self.check_project_refs(project_ids)?;
        }
        self.members.mutate(seed::default_team_members, |members| {
            let member = members
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| PmError::not_found("TeamMember", id))?;
            patch.apply_to(member);
            Ok(member.clone())
        })
    }

    #[instrument(skip(self))]
    pub fn delete_member(&self, id: Id) -> MutationResult<TeamMember> {
        self.members.mutate(seed::default_team_members, |members| {
            let index = members
                .iter()
                .position(|m| m.id == id)
                .ok_or_else(|| PmError::not_found("TeamMember", id))?;
            Ok(members.remove(index))
        })
    }

    fn check_project_refs(&self, project_ids: &[Id]) -> Result<(), ValidationErrors> {
        let projects: Vec<Project> = self.members.store().get_collection(Collection::Projects);
        let known: HashSet<Id> = projects.iter().map(|p| p.id).collect();

        let mut errors = ValidationErrors::new();
        for id in project_ids.iter().filter(|id| !known.contains(id)) {
            errors.add("currentProjects", format!("references unknown project {}", id));
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pm_core::clock::FixedClock;
    use pm_store::{Initializer, MemoryStorage};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn setup() -> (Arc<PersistentStore<MemoryStorage>>, TeamRoster<MemoryStorage>) {
        let store = Arc::new(PersistentStore::new(MemoryStorage::new(), "pm"));
        Initializer::new(&*store).run();
        let roster = TeamRoster::open(store.clone(), Arc::new(FixedClock::on(today())));
        (store, roster)
    }

    fn stored(store: &PersistentStore<MemoryStorage>) -> Vec<TeamMember> {
        store.get_collection(Collection::TeamMembers)
    }

    #[test]
    fn test_defaults_are_not_persisted_until_first_write() {
        let (store, roster) = setup();
        assert_eq!(roster.members().len(), 5);
        assert!(stored(&store).is_empty());

        roster
            .add_member(MemberDraft::new("Ada", "ada@example.com", "Architect", "Engineering"))
            .unwrap();
        assert_eq!(stored(&store).len(), 6);
    }

    #[test]
    fn test_add_member_defaults() {
        let (_store, roster) = setup();
        let member = roster
            .add_member(MemberDraft::new("Ada", "ada@example.com", "Architect", "Engineering"))
            .unwrap()
            .value;

        assert_eq!(member.id, 6);
        assert_eq!(member.join_date, today());
        assert!(member.current_projects.is_empty());
        assert_eq!(member.avatar, pm_models::member::DEFAULT_AVATAR);
    }

    #[test]
    fn test_add_member_requires_fields() {
        let (_store, roster) = setup();
        let err = roster
            .add_member(MemberDraft::new("Ada", "not-an-email", "", "Engineering"))
            .unwrap_err();
        let PmError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.has_error("email"));
        assert!(errors.has_error("role"));
        assert_eq!(roster.members().len(), 5);
    }

    #[test]
    fn test_update_rejects_dangling_project_ids() {
        let (store, roster) = setup();
        let patch = MemberPatch {
            current_projects: Some(vec![1, 42]),
            ..Default::default()
        };
        let err = roster.update_member(2, patch).unwrap_err();
        assert_eq!(err.error_code(), "validation_failed");
        assert!(stored(&store).is_empty());

        let patch = MemberPatch {
            current_projects: Some(vec![1]),
            workload: Some(10),
            ..Default::default()
        };
        let member = roster.update_member(2, patch).unwrap().value;
        assert_eq!(member.current_projects, vec![1]);
        assert_eq!(member.workload, 10);
        assert_eq!(member.name, "Li Si");
    }

    #[test]
    fn test_member_projects_skips_dangling_ids() {
        let (_store, roster) = setup();
        // Seeded roster references projects 1, 2, 5; only 1 exists
        let member = roster.get_member(3).unwrap();
        let projects = roster.member_projects(&member);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, 1);
    }

    #[test]
    fn test_delete_member() {
        let (store, roster) = setup();
        roster.delete_member(5).unwrap();
        assert_eq!(stored(&store).len(), 4);
        assert!(roster.delete_member(5).unwrap_err().is_not_found());
    }

    #[test]
    fn test_stats() {
        let (_store, roster) = setup();
        let stats = roster.stats();
        assert_eq!(stats.total_members, 5);
        // (85 + 90 + 95 + 70 + 75) / 5 = 83
        assert_eq!(stats.avg_workload, 83);
        // (92 + 88 + 95 + 89 + 87) / 5 = 90.2
        assert_eq!(stats.avg_performance, 90);
        assert_eq!(stats.busy_members, 3);

        assert_eq!(TeamStats::from_members(&[]), TeamStats::default());
    }
}

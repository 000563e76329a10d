//! Update log, milestones, requirements and risks
//!
//! Each operation here rewrites one nested part of a project and stamps
//! `lastUpdate` with today's date.

use chrono::NaiveDate;
use pm_core::error::PmError;
use pm_core::result::MutationResult;
use pm_core::traits::{id_after, next_id, Id};
use pm_models::{
    Milestone, MilestoneKey, MilestoneStatus, Project, ProjectUpdate, Requirement,
    RequirementDraft, RequirementPatch, Risk,
};
use pm_store::Storage;
use tracing::{debug, instrument};

use super::{find_mut, ProjectRepository};

impl<S: Storage> ProjectRepository<S> {
    /// Prepend an entry to the update log and mirror it into `dailyProgress`
    #[instrument(skip(self, content, author))]
    pub fn add_project_update(
        &self,
        id: Id,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> MutationResult<ProjectUpdate> {
        let content = content.into();
        let author = author.into();
        let now = self.clock.now();
        let today = self.clock.today();

        self.projects.mutate(Vec::new, |projects| {
            let project = find_mut(projects, id)?;
            let stamp = now.timestamp_millis();
            let update_id = match project.latest_update() {
                Some(head) if head.id >= stamp => id_after(head.id)?,
                _ => stamp,
            };
            let update = ProjectUpdate {
                id: update_id,
                author,
                date: today,
                content: content.clone(),
                kind: ProjectUpdate::KIND_UPDATE.to_string(),
            };
            project.updates.insert(0, update.clone());
            project.daily_progress = content;
            project.last_update = today;
            debug!(update_id, "Update logged");
            Ok(update)
        })
    }

    /// Set a milestone's status; the actual date defaults to today
    #[instrument(skip(self))]
    pub fn update_milestone(
        &self,
        id: Id,
        key: MilestoneKey,
        status: MilestoneStatus,
        date: Option<NaiveDate>,
    ) -> MutationResult<Milestone> {
        let today = self.clock.today();
        self.projects.mutate(Vec::new, |projects| {
            let project = find_mut(projects, id)?;
            let milestone = project.milestones.get_mut(key);
            milestone.status = status;
            milestone.date = Some(date.unwrap_or(today));
            let milestone = milestone.clone();
            project.last_update = today;
            Ok(milestone)
        })
    }

    /// Append a requirement with the next id within the project
    #[instrument(skip(self, draft))]
    pub fn add_requirement(&self, id: Id, draft: RequirementDraft) -> MutationResult<Requirement> {
        draft.check()?;
        let today = self.clock.today();
        self.projects.mutate(Vec::new, |projects| {
            let project = find_mut(projects, id)?;
            let requirement = draft.into_requirement(next_id(project.requirements.iter())?);
            project.requirements.push(requirement.clone());
            project.last_update = today;
            Ok(requirement)
        })
    }

    #[instrument(skip(self, patch))]
    pub fn update_requirement(
        &self,
        id: Id,
        requirement_id: Id,
        patch: RequirementPatch,
    ) -> MutationResult<Requirement> {
        let today = self.clock.today();
        self.projects.mutate(Vec::new, |projects| {
            let project = find_mut(projects, id)?;
            let requirement = project
                .requirements
                .iter_mut()
                .find(|r| r.id == requirement_id)
                .ok_or_else(|| PmError::not_found("Requirement", requirement_id))?;
            patch.apply_to(requirement);
            let requirement = requirement.clone();
            project.last_update = today;
            Ok(requirement)
        })
    }

    #[instrument(skip(self, risk))]
    pub fn add_risk(&self, id: Id, risk: Risk) -> MutationResult<Project> {
        let today = self.clock.today();
        self.projects.mutate(Vec::new, |projects| {
            let project = find_mut(projects, id)?;
            project.risks.push(risk);
            project.last_update = today;
            Ok(project.clone())
        })
    }

    /// Remove the risk at `index`
    ///
    /// Risks have no identity, so the index refers to the cached order. A
    /// concurrent change elsewhere surfaces as a conflict rather than removing
    /// the wrong entry.
    #[instrument(skip(self))]
    pub fn remove_risk(&self, id: Id, index: usize) -> MutationResult<Risk> {
        let today = self.clock.today();
        self.projects.mutate(Vec::new, |projects| {
            let project = find_mut(projects, id)?;
            if index >= project.risks.len() {
                return Err(PmError::not_found("Risk", Id::try_from(index).unwrap_or(Id::MAX)));
            }
            let risk = project.risks.remove(index);
            project.last_update = today;
            Ok(risk)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use pm_models::{Priority, ProjectPatch};
    use pm_store::Collection;

    #[test]
    fn test_update_is_prepended_and_mirrored() {
        let store = store();
        let repo = repository(&store);

        let first = repo.add_project_update(1, "Kickoff done", "Ada").unwrap().value;
        let second = repo.add_project_update(1, "API frozen", "Bo").unwrap().value;
        assert!(second.id > first.id);

        let project = repo.get_project(1).unwrap();
        assert_eq!(project.updates[0].content, "API frozen");
        assert_eq!(project.updates[1].content, "Kickoff done");
        assert_eq!(project.updates[0].kind, "update");
        assert_eq!(project.daily_progress, "API frozen");
        assert_eq!(project.last_update, today());

        let stored: Vec<Project> = store.get_collection(Collection::Projects);
        assert_eq!(stored[0].updates.len(), 2);
    }

    #[test]
    fn test_update_after_max_head_id_is_an_error() {
        let store = store();
        let repo = repository(&store);
        let mut patch = ProjectPatch::new();
        patch.updates = Some(vec![ProjectUpdate {
            id: Id::MAX,
            author: "Ada".to_string(),
            date: today(),
            content: "Imported".to_string(),
            kind: ProjectUpdate::KIND_UPDATE.to_string(),
        }]);
        repo.update_project(1, patch).unwrap();

        let err = repo.add_project_update(1, "One more", "Bo").unwrap_err();
        assert_eq!(err.error_code(), "internal_error");
        assert_eq!(repo.get_project(1).unwrap().updates.len(), 1);
    }

    #[test]
    fn test_update_on_missing_project() {
        let store = store();
        let repo = repository(&store);
        assert!(repo.add_project_update(5, "x", "y").unwrap_err().is_not_found());
    }

    #[test]
    fn test_milestone_date_defaults_to_today() {
        let store = store();
        let repo = repository(&store);

        let milestone = repo
            .update_milestone(1, MilestoneKey::Integration, MilestoneStatus::InProgress, None)
            .unwrap()
            .value;
        assert_eq!(milestone.status, MilestoneStatus::InProgress);
        assert_eq!(milestone.date, Some(today()));

        let explicit = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        repo.update_milestone(1, MilestoneKey::Testing, MilestoneStatus::Completed, Some(explicit))
            .unwrap();

        let project = repo.get_project(1).unwrap();
        assert_eq!(project.milestones.testing.date, Some(explicit));
        // Planned date and owner survive the merge
        assert_eq!(project.milestones.testing.owner, "Qian Qi");
        assert_eq!(project.milestones.iter().count(), 6);
    }

    #[test]
    fn test_requirements_get_local_ids() {
        let store = store();
        let repo = repository(&store);

        let added = repo
            .add_requirement(1, RequirementDraft::new("Audit logging"))
            .unwrap()
            .value;
        assert_eq!(added.id, 4);

        let patch = RequirementPatch {
            progress: Some(55),
            ..Default::default()
        };
        let updated = repo.update_requirement(1, 4, patch).unwrap().value;
        assert_eq!(updated.progress, 55);
        assert_eq!(updated.title, "Audit logging");

        assert!(repo
            .update_requirement(1, 99, RequirementPatch::default())
            .unwrap_err()
            .is_not_found());
        assert!(repo
            .add_requirement(1, RequirementDraft::new(""))
            .unwrap_err()
            .to_string()
            .contains("title"));
    }

    #[test]
    fn test_risks_append_and_remove_by_index() {
        let store = store();
        let repo = repository(&store);

        repo.add_risk(1, Risk::new(Priority::High, "Vendor lock-in")).unwrap();
        assert_eq!(repo.get_project(1).unwrap().risks.len(), 3);

        let removed = repo.remove_risk(1, 0).unwrap().value;
        assert_eq!(removed.description, "Third-party payment API responds slowly");

        let risks = repo.get_project(1).unwrap().risks;
        assert_eq!(risks.len(), 2);
        assert_eq!(risks[1].description, "Vendor lock-in");

        assert!(repo.remove_risk(1, 7).unwrap_err().is_not_found());
        let err = repo.remove_risk(1, usize::MAX).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!("Not found: Risk with id={}", Id::MAX));
    }
}

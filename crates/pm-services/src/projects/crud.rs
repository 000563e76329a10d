//! Create, patch and delete whole projects

use pm_core::error::PmError;
use pm_core::result::MutationResult;
use pm_core::traits::{next_id, Id};
use pm_models::{Project, ProjectDraft, ProjectPatch};
use pm_store::Storage;
use tracing::{info, instrument};

use super::{find_mut, ProjectRepository};

impl<S: Storage> ProjectRepository<S> {
    /// Assign the next id and append
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub fn add_project(&self, draft: ProjectDraft) -> MutationResult<Project> {
        draft.check()?;
        let applied = self.projects.mutate(Vec::new, |projects| {
            let project = draft.into_project(next_id(projects.iter())?);
            projects.push(project.clone());
            Ok(project)
        })?;
        info!(id = applied.value.id, persisted = applied.is_persisted(), "Project added");
        Ok(applied)
    }

    /// Shallow merge: fields present in `patch` replace the stored values
    #[instrument(skip(self, patch))]
    pub fn update_project(&self, id: Id, patch: ProjectPatch) -> MutationResult<Project> {
        self.projects.mutate(Vec::new, |projects| {
            let project = find_mut(projects, id)?;
            patch.apply_to(project);
            Ok(project.clone())
        })
    }

    /// Remove by id, returning the removed project
    #[instrument(skip(self))]
    pub fn delete_project(&self, id: Id) -> MutationResult<Project> {
        let applied = self.projects.mutate(Vec::new, |projects| {
            let index = projects
                .iter()
                .position(|p| p.id == id)
                .ok_or_else(|| PmError::not_found("Project", id))?;
            Ok(projects.remove(index))
        })?;
        info!(id, persisted = applied.is_persisted(), "Project deleted");
        Ok(applied)
    }

    /// Set progress and stamp `lastUpdate` with today's date
    #[instrument(skip(self))]
    pub fn update_project_progress(&self, id: Id, progress: i32) -> MutationResult<Project> {
        let patch = ProjectPatch::new()
            .with_progress(progress)
            .with_last_update(self.clock.today());
        self.update_project(id, patch)
    }
}

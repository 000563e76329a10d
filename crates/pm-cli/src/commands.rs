//! Subcommand execution

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use pm_core::clock::{Clock, SystemClock};
use pm_core::config::AppConfig;
use pm_core::error::PmError;
use pm_core::result::{Applied, WriteStatus};
use pm_export::{write_csv_export, write_json_export, ExportOptions};
use pm_models::{MilestoneKey, Owner, ProjectDraft, RequirementDraft, Risk};
use pm_queries::{MemberFacets, MemberFilters, ProjectFacets, ProjectFilters};
use pm_services::{ProjectRepository, TeamRoster};
use pm_store::{LocalStorage, PersistentStore};
use tracing::{info, warn};

use crate::cli::{Command, ExportFormat};
use crate::render;

pub struct App {
    config: AppConfig,
    store: Arc<PersistentStore<LocalStorage>>,
    clock: Arc<dyn Clock>,
    json: bool,
}

impl App {
    pub fn open(config: AppConfig, json: bool) -> anyhow::Result<Self> {
        Self::with_clock(config, json, Arc::new(SystemClock))
    }

    pub fn with_clock(config: AppConfig, json: bool, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let storage = LocalStorage::open(&config.storage.data_dir)
            .with_context(|| {
                format!("opening data directory {}", config.storage.data_dir.display())
            })?
            .with_quota(config.storage.quota_bytes);
        let store = Arc::new(PersistentStore::new(storage, config.storage.key_prefix.clone()));
        Ok(Self {
            config,
            store,
            clock,
            json,
        })
    }

    fn projects(&self) -> ProjectRepository<LocalStorage> {
        ProjectRepository::open(
            self.store.clone(),
            self.clock.clone(),
            self.config.storage.seed_defaults,
        )
    }

    fn roster(&self) -> TeamRoster<LocalStorage> {
        TeamRoster::open(self.store.clone(), self.clock.clone())
    }

    fn export_dir(&self, out: Option<PathBuf>) -> PathBuf {
        out.unwrap_or_else(|| self.config.export.output_dir.clone())
    }

    pub fn run(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::List {
                search,
                status,
                priority,
                category,
                tag,
                facets,
            } => {
                let filters = ProjectFilters {
                    search,
                    status,
                    priority,
                    category,
                    tag,
                };
                let repo = self.projects();
                repo.with_projects(|projects| -> anyhow::Result<()> {
                    let matching = filters.apply(projects);
                    render::project_list(&matching, self.json)?;
                    if facets {
                        render::project_facets(&ProjectFacets::collect(projects), self.json)?;
                    }
                    Ok(())
                })
            }
            Command::Show { id } => {
                let project = self.projects().get_project(id)?;
                render::project_detail(&project, self.json)
            }
            Command::New {
                name,
                owner,
                category,
                priority,
            } => {
                let owner = Owner {
                    name: owner.unwrap_or_else(|| self.config.defaults.author.clone()),
                    avatar: String::new(),
                    role: String::new(),
                    email: None,
                };
                let mut draft = ProjectDraft::blank(self.clock.today(), owner);
                draft.name = name;
                if let Some(category) = category {
                    draft.category = category;
                }
                if let Some(priority) = priority {
                    draft.priority = priority;
                }
                let applied = self.projects().add_project(draft)?;
                report(&applied);
                render::project_detail(&applied.value, self.json)
            }
            Command::Progress { id, value } => {
                let applied = self.projects().update_project_progress(id, value)?;
                report(&applied);
                render::done(format!("Project {} progress set to {}%", id, value))
            }
            Command::Note { id, text, author } => {
                let author = author.unwrap_or_else(|| self.config.defaults.author.clone());
                let applied = self.projects().add_project_update(id, text, author)?;
                report(&applied);
                render::done(format!("Update {} logged on project {}", applied.value.id, id))
            }
            Command::Milestone {
                id,
                key,
                status,
                date,
            } => {
                let key: MilestoneKey = key.parse().map_err(PmError::InvalidInput)?;
                let applied = self.projects().update_milestone(id, key, status, date)?;
                report(&applied);
                render::done(format!("Milestone {} of project {} is now {}", key, id, status))
            }
            Command::AddRequirement {
                id,
                title,
                assignee,
                priority,
            } => {
                let mut draft = RequirementDraft::new(title);
                if let Some(assignee) = assignee {
                    draft.assignee = assignee;
                }
                if let Some(priority) = priority {
                    draft.priority = priority;
                }
                let applied = self.projects().add_requirement(id, draft)?;
                report(&applied);
                render::done(format!("Requirement {} added to project {}", applied.value.id, id))
            }
            Command::AddRisk { id, level, text } => {
                let applied = self.projects().add_risk(id, Risk::new(level, text))?;
                report(&applied);
                render::done(format!("Risk added to project {}", id))
            }
            Command::RemoveRisk { id, index } => {
                let applied = self.projects().remove_risk(id, index)?;
                report(&applied);
                render::done(format!("Removed risk: {}", applied.value.description))
            }
            Command::Delete { id } => {
                let applied = self.projects().delete_project(id)?;
                report(&applied);
                render::done(format!("Deleted project {} ({})", id, applied.value.name))
            }
            Command::Team {
                search,
                department,
                role,
            } => {
                let filters = MemberFilters {
                    search,
                    department,
                    role,
                };
                let members = self.roster().members();
                render::member_list(&filters.apply(&members), self.json)?;
                if !self.json {
                    let facets = MemberFacets::collect(&members);
                    println!();
                    println!("Departments: {}", facets.departments.join(", "));
                    println!("Roles: {}", facets.roles.join(", "));
                }
                Ok(())
            }
            Command::Stats => {
                let dashboard = self.projects().dashboard_stats();
                let team = self.roster().stats();
                render::stats(&dashboard, &team, self.json)
            }
            Command::Export { format, only, out } => {
                let dir = self.export_dir(out);
                let path = self.export(format, only, &dir)?;
                render::done(format!("Wrote {}", path.display()))
            }
            Command::Import { file } => {
                let summary = pm_export::import_file(self.store.as_ref(), &file)?;
                info!(?summary, "Import finished");
                render::import_summary(&summary, self.json)
            }
            Command::Reset { yes } => {
                if !yes {
                    bail!("refusing to remove all data without --yes");
                }
                self.store
                    .try_clear_all()
                    .context("clearing stored collections")?;
                render::done("All collections removed".to_string())
            }
        }
    }

    fn export(
        &self,
        format: ExportFormat,
        only: Vec<pm_export::ExportSlice>,
        dir: &Path,
    ) -> anyhow::Result<PathBuf> {
        let options = if only.is_empty() {
            ExportOptions::all()
        } else {
            ExportOptions::only(only)
        };
        let projects = self.projects().projects();

        let path = match format {
            ExportFormat::Json => {
                // The roster as displayed: an empty collection exports the
                // in-memory default members and counts them in totalTeamMembers.
                let members = self.roster().members();
                info!(
                    items = options.item_count(&projects, &members),
                    "Exporting JSON"
                );
                write_json_export(dir, &options, &projects, &members, self.clock.now())?
            }
            ExportFormat::Csv => {
                if !options.projects {
                    bail!("CSV export contains projects only; include the projects slice");
                }
                write_csv_export(dir, &projects, self.clock.today())?
            }
        };
        Ok(path)
    }
}

/// Warn when a change stayed in memory only
fn report<T>(applied: &Applied<T>) {
    if let WriteStatus::PersistFailed { reason } = &applied.status {
        warn!(reason = %reason, "Change was not saved");
        eprintln!("warning: change was not saved: {}", reason);
    }
}

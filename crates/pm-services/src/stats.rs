//! Dashboard header figures

use pm_models::{Priority, Project};
use serde::Serialize;

/// Statuses that count a project as finished
pub const COMPLETED_STATUSES: [&str; 2] = ["Launched", "Completed"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub high_priority: usize,
    /// Rounded mean of `progress`; 0 with no projects
    pub average_progress: i32,
}

impl DashboardStats {
    pub fn from_projects(projects: &[Project]) -> Self {
        let average_progress = if projects.is_empty() {
            0
        } else {
            let sum: i64 = projects.iter().map(|p| i64::from(p.progress)).sum();
            (sum as f64 / projects.len() as f64).round() as i32
        };

        Self {
            total_projects: projects.len(),
            active_projects: projects
                .iter()
                .filter(|p| !COMPLETED_STATUSES.contains(&p.status.as_str()))
                .count(),
            high_priority: projects
                .iter()
                .filter(|p| p.priority == Priority::High)
                .count(),
            average_progress,
        }
    }
}

impl<S: pm_store::Storage> crate::ProjectRepository<S> {
    pub fn dashboard_stats(&self) -> DashboardStats {
        self.with_projects(DashboardStats::from_projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_models::seed;

    #[test]
    fn test_empty() {
        assert_eq!(DashboardStats::from_projects(&[]), DashboardStats::default());
    }

    #[test]
    fn test_counts() {
        let mut projects = seed::default_projects();
        let mut done = projects[0].clone();
        done.id = 2;
        done.status = "Completed".to_string();
        done.priority = Priority::Low;
        done.progress = 100;
        projects.push(done);

        let stats = DashboardStats::from_projects(&projects);
        assert_eq!(stats.total_projects, 2);
        assert_eq!(stats.active_projects, 1);
        assert_eq!(stats.high_priority, 1);
        // (65 + 100) / 2 = 82.5
        assert_eq!(stats.average_progress, 83);
    }
}

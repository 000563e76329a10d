//! Terminal output

use pm_models::{Project, TeamMember};
use pm_queries::ProjectFacets;
use pm_services::{DashboardStats, TeamStats};
use pm_store::ImportSummary;
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn done(message: String) -> anyhow::Result<()> {
    println!("{}", message);
    Ok(())
}

pub fn project_list(projects: &[&Project], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(projects);
    }
    if projects.is_empty() {
        println!("No matching projects");
        return Ok(());
    }
    println!(
        "{:>4}  {:<32} {:<16} {:<8} {:>5}  {}",
        "ID", "NAME", "STATUS", "PRIORITY", "PROG", "LAST UPDATE"
    );
    for p in projects {
        println!(
            "{:>4}  {:<32} {:<16} {:<8} {:>4}%  {}",
            p.id,
            truncate(&p.name, 32),
            truncate(&p.status, 16),
            p.priority,
            p.progress,
            p.last_update
        );
    }
    Ok(())
}

pub fn project_facets(facets: &ProjectFacets, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(facets);
    }
    println!();
    println!("Statuses: {}", facets.statuses.join(", "));
    println!("Categories: {}", facets.categories.join(", "));
    println!("Tags: {}", facets.tags.join(", "));
    Ok(())
}

pub fn project_detail(p: &Project, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(p);
    }
    println!("#{} {}", p.id, p.name);
    println!("  {}", p.description);
    println!(
        "  {} | {} priority | {} | {}%",
        p.status, p.priority, p.category, p.progress
    );
    println!("  {} -> {}, owner {}", p.start_date, p.end_date, p.owner.name);
    if !p.tags.is_empty() {
        println!("  tags: {}", p.tags.join(", "));
    }

    println!("Milestones:");
    for (key, m) in p.milestones.iter() {
        let date = m.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<12} {:<12} actual {:<10} planned {} ({})",
            key, m.status, date, m.planned_date, m.owner
        );
    }

    if !p.requirements.is_empty() {
        println!("Requirements:");
        for r in &p.requirements {
            println!("  [{}] {} - {} {}% ({})", r.id, r.title, r.status, r.progress, r.assignee);
        }
    }
    if !p.risks.is_empty() {
        println!("Risks:");
        for (index, risk) in p.risks.iter().enumerate() {
            println!("  {}. [{}] {}", index, risk.level, risk.description);
        }
    }
    if !p.updates.is_empty() {
        println!("Updates:");
        for u in &p.updates {
            println!("  {} {}: {}", u.date, u.author, u.content);
        }
    }
    println!("Last update: {}", p.last_update);
    Ok(())
}

pub fn member_list(members: &[&TeamMember], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(members);
    }
    for m in members {
        let busy = if m.is_busy() { " (busy)" } else { "" };
        println!(
            "{:>3}  {:<16} {:<20} {:<12} {:>3}%{}",
            m.id,
            truncate(&m.name, 16),
            truncate(&m.role, 20),
            truncate(&m.department, 12),
            m.workload,
            busy
        );
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsView<'a> {
    projects: &'a DashboardStats,
    team: &'a TeamStats,
}

pub fn stats(dashboard: &DashboardStats, team: &TeamStats, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&StatsView {
            projects: dashboard,
            team,
        });
    }
    println!(
        "Projects: {} total, {} active, {} high priority, {}% average progress",
        dashboard.total_projects,
        dashboard.active_projects,
        dashboard.high_priority,
        dashboard.average_progress
    );
    println!(
        "Team: {} members, {}% average workload, {}% average performance, {} busy",
        team.total_members, team.avg_workload, team.avg_performance, team.busy_members
    );
    Ok(())
}

pub fn import_summary(summary: &ImportSummary, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::json!({
            "projects": summary.projects,
            "teamMembers": summary.team_members,
            "settings": summary.settings,
        }));
    }
    if summary.is_empty() {
        println!("Nothing imported: the file has no projects, teamMembers or settings");
        return Ok(());
    }
    if let Some(n) = summary.projects {
        println!("Imported {} projects", n);
    }
    if let Some(n) = summary.team_members {
        println!("Imported {} team members", n);
    }
    if summary.settings {
        println!("Imported settings");
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

//! Demonstration data seeded into an empty store

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::member::{TeamMember, DEFAULT_AVATAR};
use crate::milestone::{Milestone, MilestoneStatus, Milestones};
use crate::priority::Priority;
use crate::project::{Owner, Project, Requirement, Risk, TeamSlot};

const SLOT_AVATAR: &str = "/placeholder.svg?height=20&width=20";

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    // Literal dates below are all valid calendar days.
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn slot(name: &str, progress: i32, workload: &str) -> TeamSlot {
    TeamSlot {
        name: name.to_string(),
        avatar: SLOT_AVATAR.to_string(),
        progress,
        workload: workload.to_string(),
    }
}

fn milestone(status: MilestoneStatus, date: Option<NaiveDate>, planned: NaiveDate, owner: &str) -> Milestone {
    Milestone {
        status,
        date,
        planned_date: planned,
        owner: owner.to_string(),
    }
}

fn requirement(id: i64, title: &str, status: &str, priority: Priority, assignee: &str, progress: i32) -> Requirement {
    Requirement {
        id,
        title: title.to_string(),
        status: status.to_string(),
        priority,
        assignee: assignee.to_string(),
        progress,
        description: None,
    }
}

/// The single project written on first run
pub fn default_projects() -> Vec<Project> {
    use MilestoneStatus::*;

    let team = BTreeMap::from([
        ("frontend".to_string(), slot("Li Si", 70, "70%")),
        ("backend".to_string(), slot("Wang Wu", 80, "90%")),
        ("data".to_string(), slot("Zhao Liu", 50, "60%")),
        ("test".to_string(), slot("Qian Qi", 30, "40%")),
        ("product".to_string(), slot("Zhang San", 90, "80%")),
    ]);

    vec![Project {
        id: 1,
        name: "E-commerce Platform Upgrade".to_string(),
        description: "Upgrade the storefront with new payment methods, a smoother checkout and better overall performance".to_string(),
        status: "In Development".to_string(),
        priority: Priority::High,
        category: "Product Development".to_string(),
        tags: vec![
            "payments".to_string(),
            "user experience".to_string(),
            "performance".to_string(),
        ],
        progress: 65,
        start_date: ymd(2024, 1, 15),
        end_date: ymd(2024, 3, 30),
        owner: Owner {
            name: "Zhang San".to_string(),
            avatar: "/placeholder.svg?height=24&width=24".to_string(),
            role: "Product Manager".to_string(),
            email: Some("zhangsan@company.com".to_string()),
        },
        assignees: None,
        team,
        milestones: Milestones {
            prd: milestone(Completed, Some(ymd(2024, 1, 20)), ymd(2024, 1, 18), "Zhang San"),
            tech_review: milestone(Completed, Some(ymd(2024, 1, 25)), ymd(2024, 1, 23), "Wang Wu"),
            development: milestone(InProgress, Some(ymd(2024, 2, 1)), ymd(2024, 2, 1), "Li Si"),
            integration: milestone(Pending, None, ymd(2024, 3, 1), "Li Si"),
            testing: milestone(Pending, None, ymd(2024, 3, 15), "Qian Qi"),
            launch: milestone(Pending, None, ymd(2024, 3, 30), "Wang Wu"),
        },
        requirements: vec![
            requirement(1, "Mobile wallet integration", "In Development", Priority::High, "Wang Wu", 60),
            requirement(2, "Search tuning", "Done", Priority::Medium, "Li Si", 100),
            requirement(3, "UI overhaul", "In Design", Priority::Medium, "Qian Qi", 40),
        ],
        daily_progress: "Core payment module is done; integration testing starts tomorrow. A performance issue is being worked on.".to_string(),
        last_update: ymd(2024, 2, 15),
        risks: vec![
            Risk::new(Priority::Medium, "Third-party payment API responds slowly"),
            Risk::new(Priority::Low, "UI design review slipped"),
        ],
        updates: Vec::new(),
    }]
}

fn member(
    id: i64,
    name: &str,
    email: &str,
    role: &str,
    department: &str,
    phone: &str,
    join_date: NaiveDate,
    skills: &[&str],
    current_projects: &[i64],
    workload: i32,
    performance: i32,
) -> TeamMember {
    TeamMember {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        department: department.to_string(),
        avatar: DEFAULT_AVATAR.to_string(),
        phone: Some(phone.to_string()),
        join_date,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        current_projects: current_projects.to_vec(),
        workload,
        performance,
    }
}

/// Roster shown when the `teamMembers` collection is empty
pub fn default_team_members() -> Vec<TeamMember> {
    vec![
        member(1, "Zhang San", "zhangsan@company.com", "Product Manager", "Product", "138-0000-1111",
            ymd(2023, 1, 15), &["Product design", "Requirements analysis", "User research"], &[1, 3], 85, 92),
        member(2, "Li Si", "lisi@company.com", "Frontend Engineer", "Engineering", "138-0000-2222",
            ymd(2023, 3, 10), &["React", "TypeScript", "Frontend architecture"], &[1, 2], 90, 88),
        member(3, "Wang Wu", "wangwu@company.com", "Backend Engineer", "Engineering", "138-0000-3333",
            ymd(2022, 11, 20), &["Node.js", "Python", "Database design"], &[1, 2, 5], 95, 95),
        member(4, "Zhao Liu", "zhaoliu@company.com", "Data Engineer", "Data", "138-0000-4444",
            ymd(2023, 5, 8), &["Data analysis", "Machine learning", "Visualization"], &[3], 70, 89),
        member(5, "Qian Qi", "qianqi@company.com", "QA Engineer", "Quality", "138-0000-5555",
            ymd(2023, 2, 14), &["Test automation", "Performance testing", "Test design"], &[1, 4], 75, 87),
    ]
}

//! Project milestones
//!
//! A project always carries exactly six milestones. The key set is closed:
//! `Milestones` has one field per key, so a partial or extended set cannot be
//! represented, and deserializing a record with a key missing fails.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MilestoneKey {
    Prd,
    TechReview,
    Development,
    Integration,
    Testing,
    Launch,
}

impl MilestoneKey {
    /// Lifecycle order
    pub const ALL: [MilestoneKey; 6] = [
        MilestoneKey::Prd,
        MilestoneKey::TechReview,
        MilestoneKey::Development,
        MilestoneKey::Integration,
        MilestoneKey::Testing,
        MilestoneKey::Launch,
    ];

    /// The persisted key name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prd => "prd",
            Self::TechReview => "techReview",
            Self::Development => "development",
            Self::Integration => "integration",
            Self::Testing => "testing",
            Self::Launch => "launch",
        }
    }

    /// Days after project start at which a fresh project plans this milestone
    pub fn default_offset_days(&self) -> i64 {
        match self {
            Self::Prd => 0,
            Self::TechReview => 7,
            Self::Development => 14,
            Self::Integration => 21,
            Self::Testing => 28,
            Self::Launch => 30,
        }
    }
}

impl fmt::Display for MilestoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MilestoneKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .or_else(|| match s.trim() {
                "tech-review" | "tech_review" => Some(Self::TechReview),
                _ => None,
            })
            .ok_or_else(|| {
                format!(
                    "unknown milestone {:?} (expected one of prd, techReview, development, integration, testing, launch)",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MilestoneStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MilestoneStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in-progress" | "in_progress" | "inprogress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(format!(
                "unknown milestone status {:?} (expected pending, in-progress or completed)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub status: MilestoneStatus,
    /// Actual date, set when the status last changed
    pub date: Option<NaiveDate>,
    pub planned_date: NaiveDate,
    pub owner: String,
}

impl Milestone {
    pub fn pending(planned_date: NaiveDate, owner: impl Into<String>) -> Self {
        Self {
            status: MilestoneStatus::Pending,
            date: None,
            planned_date,
            owner: owner.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Milestones {
    pub prd: Milestone,
    pub tech_review: Milestone,
    pub development: Milestone,
    pub integration: Milestone,
    pub testing: Milestone,
    pub launch: Milestone,
}

impl Milestones {
    /// All six milestones pending, planned at the default offsets from `start`
    pub fn planned_from(start: NaiveDate, owner: &str) -> Self {
        let at = |key: MilestoneKey| {
            Milestone::pending(start + chrono::Duration::days(key.default_offset_days()), owner)
        };
        Self {
            prd: at(MilestoneKey::Prd),
            tech_review: at(MilestoneKey::TechReview),
            development: at(MilestoneKey::Development),
            integration: at(MilestoneKey::Integration),
            testing: at(MilestoneKey::Testing),
            launch: at(MilestoneKey::Launch),
        }
    }

    pub fn get(&self, key: MilestoneKey) -> &Milestone {
        match key {
            MilestoneKey::Prd => &self.prd,
            MilestoneKey::TechReview => &self.tech_review,
            MilestoneKey::Development => &self.development,
            MilestoneKey::Integration => &self.integration,
            MilestoneKey::Testing => &self.testing,
            MilestoneKey::Launch => &self.launch,
        }
    }

    pub fn get_mut(&mut self, key: MilestoneKey) -> &mut Milestone {
        match key {
            MilestoneKey::Prd => &mut self.prd,
            MilestoneKey::TechReview => &mut self.tech_review,
            MilestoneKey::Development => &mut self.development,
            MilestoneKey::Integration => &mut self.integration,
            MilestoneKey::Testing => &mut self.testing,
            MilestoneKey::Launch => &mut self.launch,
        }
    }

    /// Milestones in lifecycle order
    pub fn iter(&self) -> impl Iterator<Item = (MilestoneKey, &Milestone)> {
        MilestoneKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    pub fn completed_count(&self) -> usize {
        self.iter()
            .filter(|(_, m)| m.status == MilestoneStatus::Completed)
            .count()
    }

    /// First milestone in lifecycle order that is not completed
    pub fn current(&self) -> Option<MilestoneKey> {
        self.iter()
            .find(|(_, m)| m.status != MilestoneStatus::Completed)
            .map(|(k, _)| k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_planned_from_offsets() {
        let ms = Milestones::planned_from(date(2024, 1, 1), "alice");
        assert_eq!(ms.prd.planned_date, date(2024, 1, 1));
        assert_eq!(ms.tech_review.planned_date, date(2024, 1, 8));
        assert_eq!(ms.launch.planned_date, date(2024, 1, 31));
        assert!(ms.iter().all(|(_, m)| m.status == MilestoneStatus::Pending && m.date.is_none()));
        assert_eq!(ms.current(), Some(MilestoneKey::Prd));
    }

    #[test]
    fn test_key_parse_and_names() {
        assert_eq!("techReview".parse::<MilestoneKey>(), Ok(MilestoneKey::TechReview));
        assert_eq!("TECHREVIEW".parse::<MilestoneKey>(), Ok(MilestoneKey::TechReview));
        assert_eq!("tech-review".parse::<MilestoneKey>(), Ok(MilestoneKey::TechReview));
        assert!("retro".parse::<MilestoneKey>().is_err());
        assert_eq!(
            serde_json::to_string(&MilestoneKey::TechReview).unwrap(),
            "\"techReview\""
        );
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&MilestoneStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!("in-progress".parse::<MilestoneStatus>(), Ok(MilestoneStatus::InProgress));
    }

    #[test]
    fn test_missing_key_rejected() {
        let ms = Milestones::planned_from(date(2024, 1, 1), "alice");
        let mut value = serde_json::to_value(&ms).unwrap();
        value.as_object_mut().unwrap().remove("launch");
        assert!(serde_json::from_value::<Milestones>(value).is_err());
    }

    #[test]
    fn test_extra_key_rejected() {
        let ms = Milestones::planned_from(date(2024, 1, 1), "alice");
        let mut value = serde_json::to_value(&ms).unwrap();
        let extra = value["prd"].clone();
        value.as_object_mut().unwrap().insert("retro".to_string(), extra);
        assert!(serde_json::from_value::<Milestones>(value).is_err());
    }

    #[test]
    fn test_completed_count_and_current() {
        let mut ms = Milestones::planned_from(date(2024, 1, 1), "alice");
        ms.get_mut(MilestoneKey::Prd).status = MilestoneStatus::Completed;
        ms.get_mut(MilestoneKey::TechReview).status = MilestoneStatus::Completed;
        assert_eq!(ms.completed_count(), 2);
        assert_eq!(ms.current(), Some(MilestoneKey::Development));
    }
}

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workforce roles, from widest to narrowest responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Supervisor,
    Lead,
    Technician,
    Operator,
    Employee,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Supervisor => "supervisor",
            Self::Lead => "lead",
            Self::Technician => "technician",
            Self::Operator => "operator",
            Self::Employee => "employee",
        }
    }
}

/// Urgency of a recommended training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// One completed training, newest first in `Employee::training_history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRecord {
    pub title: String,
    pub date: NaiveDate,
    /// Quiz percentage, 0-100.
    pub score: u8,
    pub language: String,
    #[serde(default)]
    pub source_docs: Vec<String>,
}

/// A training the system suggests an employee take next.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedTraining {
    pub title: String,
    pub reason: String,
    pub priority: Priority,
}

/// A company-scoped employee record.
///
/// Counter invariant: `completed_trainings` moves by exactly one per passed
/// quiz submission, and the same submission prepends exactly one
/// `TrainingRecord`. Seed data may violate this; live mutation never does
/// (see `roster::record_passed_quiz`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<String>,
    /// Employee ids this person directly supervises.
    #[serde(default)]
    pub supervises: Vec<Uuid>,
    pub preferred_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
    pub completed_trainings: u32,
    pub total_trainings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_training: Option<NaiveDate>,
    /// Rolling performance score 0-100, absent until first review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<u8>,
    #[serde(default)]
    pub certifications: BTreeSet<String>,
    #[serde(default)]
    pub training_history: Vec<TrainingRecord>,
    #[serde(default)]
    pub recommended_trainings: Vec<RecommendedTraining>,
}

impl Employee {
    /// Completion percentage across assigned trainings, 0 when none assigned.
    pub fn completion_percentage(&self) -> u8 {
        if self.total_trainings == 0 {
            return 0;
        }
        let ratio = f64::from(self.completed_trainings) / f64::from(self.total_trainings);
        (ratio * 100.0).round() as u8
    }
}

/// A pending invite for someone not yet in the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub department: String,
    pub position: String,
    pub invited_on: NaiveDate,
    pub redeemed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee_with_counters(completed: u32, total: u32) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: "Test".into(),
            email: "test@example.com".into(),
            department: "Production".into(),
            position: "Operator".into(),
            role: Role::Operator,
            supervisor: None,
            supervises: vec![],
            preferred_language: "en".into(),
            hire_date: None,
            completed_trainings: completed,
            total_trainings: total,
            last_training: None,
            performance: None,
            certifications: BTreeSet::new(),
            training_history: vec![],
            recommended_trainings: vec![],
        }
    }

    #[test]
    fn completion_percentage_rounds() {
        assert_eq!(employee_with_counters(8, 12).completion_percentage(), 67);
        assert_eq!(employee_with_counters(1, 3).completion_percentage(), 33);
    }

    #[test]
    fn completion_percentage_zero_total() {
        assert_eq!(employee_with_counters(0, 0).completion_percentage(), 0);
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Supervisor).unwrap();
        assert_eq!(json, "\"supervisor\"");
        let back: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(back, Role::Admin);
    }

    #[test]
    fn employee_wire_contract_is_camel_case() {
        let emp = employee_with_counters(2, 4);
        let value = serde_json::to_value(&emp).unwrap();
        assert!(value.get("completedTrainings").is_some());
        assert!(value.get("trainingHistory").is_some());
        assert!(value.get("completed_trainings").is_none());
    }
}

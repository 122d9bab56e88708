//! Employee roster operations over a `DocumentStore`.
//!
//! This is the only module that writes employee, quiz-result and
//! invitation entities. Role-based visibility is computed here over the
//! full employee list; the store is never assumed to pre-filter.

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::authorization::{has_capability, Capability};
use crate::models::{
    Employee, Invitation, Priority, QuizResultRecord, RecommendedTraining, Role, TrainingDraft,
    TrainingRecord,
};
use crate::quiz::QuizResult;
use crate::store::{paths, DocumentStore, StoreError};

#[derive(Error, Debug)]
pub enum RosterError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("stored entity could not be decoded: {0}")]
    Decode(String),

    #[error("employee {0} not found")]
    EmployeeNotFound(Uuid),

    #[error("invitation {0} not found")]
    InvitationNotFound(Uuid),

    #[error("invitation {0} was already redeemed")]
    InvitationRedeemed(Uuid),
}

/// Fields the add-employee form collects.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub role: Role,
    pub supervisor: Option<String>,
    pub preferred_language: String,
    pub hire_date: Option<NaiveDate>,
}

/// Company-scoped roster over an injected store.
pub struct Roster<'a> {
    store: &'a dyn DocumentStore,
    company_id: Uuid,
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, RosterError> {
    serde_json::from_value(value).map_err(|e| RosterError::Decode(e.to_string()))
}

fn encode<T: serde::Serialize>(entity: &T) -> Result<Value, RosterError> {
    serde_json::to_value(entity).map_err(|e| RosterError::Decode(e.to_string()))
}

impl<'a> Roster<'a> {
    pub fn new(store: &'a dyn DocumentStore, company_id: Uuid) -> Self {
        Self { store, company_id }
    }

    pub fn employee(&self, id: &Uuid) -> Result<Option<Employee>, RosterError> {
        self.store
            .get(&paths::employee(&self.company_id, id))?
            .map(decode)
            .transpose()
    }

    pub fn save_employee(&self, employee: &Employee) -> Result<(), RosterError> {
        let path = paths::employee(&self.company_id, &employee.id);
        self.store.set(&path, encode(employee)?)?;
        Ok(())
    }

    /// Create an employee with fresh counters and the standard onboarding
    /// recommendations, and persist it.
    pub fn add_employee(&self, form: NewEmployee) -> Result<Employee, RosterError> {
        let employee = Employee {
            id: Uuid::new_v4(),
            name: form.name,
            email: form.email,
            department: form.department.clone(),
            position: form.position,
            role: form.role,
            supervisor: form.supervisor,
            supervises: vec![],
            preferred_language: form.preferred_language,
            hire_date: form.hire_date,
            completed_trainings: 0,
            total_trainings: 0,
            last_training: None,
            performance: None,
            certifications: Default::default(),
            training_history: vec![],
            recommended_trainings: vec![
                RecommendedTraining {
                    title: "Company Orientation".into(),
                    reason: "New employee onboarding".into(),
                    priority: Priority::High,
                },
                RecommendedTraining {
                    title: "Safety Fundamentals".into(),
                    reason: "Required for all new hires".into(),
                    priority: Priority::High,
                },
                RecommendedTraining {
                    title: format!("{} Basics", form.department),
                    reason: "Department-specific training".into(),
                    priority: Priority::High,
                },
            ],
        };
        self.save_employee(&employee)?;
        tracing::info!(employee = %employee.name, department = %employee.department, "employee added");
        Ok(employee)
    }

    /// Persist one quiz submission and, when it passed, advance the
    /// employee's counters.
    ///
    /// A passed submission moves `completed_trainings` by exactly one and
    /// prepends exactly one history entry carrying the just-computed
    /// percentage. A failed submission stores the result record only.
    pub fn record_quiz_submission(
        &self,
        employee_id: &Uuid,
        draft: &TrainingDraft,
        result: &QuizResult,
        submitted_on: NaiveDate,
    ) -> Result<Employee, RosterError> {
        let record = QuizResultRecord {
            id: Uuid::new_v4(),
            employee_id: *employee_id,
            training_title: draft.title.clone(),
            score: result.score,
            total: result.total,
            percentage: result.percentage,
            passed: result.passed,
            language: draft.language.clone(),
            submitted_on,
        };
        self.store.set(
            &paths::quiz_result(&self.company_id, &record.id),
            encode(&record)?,
        )?;

        let mut employee = self
            .employee(employee_id)?
            .ok_or(RosterError::EmployeeNotFound(*employee_id))?;

        if result.passed {
            employee.completed_trainings += 1;
            employee.last_training = Some(submitted_on);
            employee.training_history.insert(
                0,
                TrainingRecord {
                    title: draft.title.clone(),
                    date: submitted_on,
                    score: result.percentage,
                    language: draft.language.clone(),
                    source_docs: draft.documents.iter().map(|d| d.name.clone()).collect(),
                },
            );
            self.save_employee(&employee)?;
            tracing::info!(
                employee = %employee.name,
                training = %draft.title,
                percentage = result.percentage,
                "passed training recorded"
            );
        }

        Ok(employee)
    }

    pub fn create_invitation(
        &self,
        email: &str,
        name: &str,
        role: Role,
        department: &str,
        position: &str,
        invited_on: NaiveDate,
    ) -> Result<Invitation, RosterError> {
        let invitation = Invitation {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            role,
            department: department.into(),
            position: position.into(),
            invited_on,
            redeemed: false,
        };
        self.store.set(
            &paths::invitation(&self.company_id, &invitation.id),
            encode(&invitation)?,
        )?;
        Ok(invitation)
    }

    /// Turn an open invitation into a roster entry and mark it redeemed.
    pub fn redeem_invitation(
        &self,
        invitation_id: &Uuid,
        preferred_language: &str,
        hire_date: NaiveDate,
    ) -> Result<Employee, RosterError> {
        let path = paths::invitation(&self.company_id, invitation_id);
        let invitation: Invitation = self
            .store
            .get(&path)?
            .map(decode)
            .transpose()?
            .ok_or(RosterError::InvitationNotFound(*invitation_id))?;

        if invitation.redeemed {
            return Err(RosterError::InvitationRedeemed(*invitation_id));
        }

        let employee = self.add_employee(NewEmployee {
            name: invitation.name.clone(),
            email: invitation.email.clone(),
            department: invitation.department.clone(),
            position: invitation.position.clone(),
            role: invitation.role,
            supervisor: None,
            preferred_language: preferred_language.into(),
            hire_date: Some(hire_date),
        })?;

        self.store
            .update(&path, serde_json::json!({"redeemed": true}))?;
        Ok(employee)
    }
}

/// Employees a viewer may see, computed capability-first over the full
/// list. View-all roles see everyone; department-scoped roles see their
/// department plus anyone they explicitly supervise; everyone sees
/// themselves.
pub fn visible_employees<'e>(viewer: &Employee, all: &'e [Employee]) -> Vec<&'e Employee> {
    if has_capability(viewer.role, Capability::ViewAllEmployees) {
        return all.iter().collect();
    }
    if has_capability(viewer.role, Capability::ViewDepartment) {
        return all
            .iter()
            .filter(|e| {
                e.department == viewer.department
                    || viewer.supervises.contains(&e.id)
                    || e.id == viewer.id
            })
            .collect();
    }
    all.iter().filter(|e| e.id == viewer.id).collect()
}

pub fn employees_in_department<'e>(all: &'e [Employee], department: &str) -> Vec<&'e Employee> {
    all.iter().filter(|e| e.department == department).collect()
}

/// Aggregate numbers for the dashboard header cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_employees: usize,
    /// Average per-employee completion percentage, rounded.
    pub avg_completion: u8,
    /// Assigned-but-not-completed trainings across the roster.
    pub active_trainings: u32,
    /// Average performance over employees that have a score, rounded.
    pub avg_performance: u8,
}

pub fn dashboard_stats(employees: &[Employee]) -> DashboardStats {
    if employees.is_empty() {
        return DashboardStats {
            total_employees: 0,
            avg_completion: 0,
            active_trainings: 0,
            avg_performance: 0,
        };
    }

    let completion_sum: f64 = employees
        .iter()
        .map(|e| f64::from(e.completion_percentage()))
        .sum();
    let active_trainings = employees
        .iter()
        .map(|e| e.total_trainings.saturating_sub(e.completed_trainings))
        .sum();

    let scored: Vec<u8> = employees.iter().filter_map(|e| e.performance).collect();
    let avg_performance = if scored.is_empty() {
        0
    } else {
        (scored.iter().map(|&p| f64::from(p)).sum::<f64>() / scored.len() as f64).round() as u8
    };

    DashboardStats {
        total_employees: employees.len(),
        avg_completion: (completion_sum / employees.len() as f64).round() as u8,
        active_trainings,
        avg_performance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentAttachment, QuizQuestion};
    use crate::quiz::QuizSession;
    use crate::store::MemoryStore;

    fn roster_env() -> (MemoryStore, Uuid) {
        (MemoryStore::new(), Uuid::new_v4())
    }

    fn form(name: &str, department: &str, role: Role) -> NewEmployee {
        NewEmployee {
            name: name.into(),
            email: format!("{}@acme.test", name.to_lowercase().replace(' ', ".")),
            department: department.into(),
            position: "Operator".into(),
            role,
            supervisor: None,
            preferred_language: "en".into(),
            hire_date: None,
        }
    }

    fn draft_with_doc(title: &str) -> TrainingDraft {
        let mut draft = TrainingDraft {
            title: title.into(),
            ..TrainingDraft::default()
        };
        draft.documents.push(DocumentAttachment {
            name: "manual.pdf".into(),
            size: 1,
            mime_type: "application/pdf".into(),
            extracted_text: Some("text".into()),
        });
        draft
    }

    fn question(correct: usize) -> QuizQuestion {
        QuizQuestion {
            question: "q".into(),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct,
            explanation: "e".into(),
            kind: "t".into(),
            source: None,
        }
    }

    fn scored_result(correct_answers: usize, total: usize) -> QuizResult {
        let mut session = QuizSession::new(vec![question(0); total], 80);
        for i in 0..total {
            let choice = if i < correct_answers { 0 } else { 1 };
            session.select_answer(i, choice).unwrap();
        }
        session.submit().unwrap().clone()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn new_employee_starts_with_onboarding_recommendations() {
        let (store, company) = roster_env();
        let roster = Roster::new(&store, company);

        let employee = roster.add_employee(form("John Smith", "Maintenance", Role::Employee)).unwrap();
        assert_eq!(employee.completed_trainings, 0);
        assert_eq!(employee.recommended_trainings.len(), 3);
        assert!(employee
            .recommended_trainings
            .iter()
            .any(|r| r.title == "Maintenance Basics"));

        let reloaded = roster.employee(&employee.id).unwrap().unwrap();
        assert_eq!(reloaded.name, "John Smith");
    }

    #[test]
    fn passed_submission_moves_counters_by_exactly_one() {
        let (store, company) = roster_env();
        let roster = Roster::new(&store, company);
        let employee = roster.add_employee(form("Sarah", "Production", Role::Employee)).unwrap();

        let result = scored_result(4, 5); // 80%, passes at threshold 80
        let updated = roster
            .record_quiz_submission(&employee.id, &draft_with_doc("SQF Compliance"), &result, date("2026-08-06"))
            .unwrap();

        assert_eq!(updated.completed_trainings, 1);
        assert_eq!(updated.training_history.len(), 1);
        assert_eq!(updated.training_history[0].title, "SQF Compliance");
        assert_eq!(updated.training_history[0].score, 80);
        assert_eq!(updated.training_history[0].source_docs, vec!["manual.pdf"]);
        assert_eq!(updated.last_training, Some(date("2026-08-06")));

        // Invariant holds on the persisted copy too.
        let reloaded = roster.employee(&employee.id).unwrap().unwrap();
        assert_eq!(reloaded.completed_trainings as usize, reloaded.training_history.len());
    }

    #[test]
    fn newest_history_entry_is_first() {
        let (store, company) = roster_env();
        let roster = Roster::new(&store, company);
        let employee = roster.add_employee(form("Sarah", "Production", Role::Employee)).unwrap();

        roster
            .record_quiz_submission(&employee.id, &draft_with_doc("First"), &scored_result(5, 5), date("2026-08-01"))
            .unwrap();
        let updated = roster
            .record_quiz_submission(&employee.id, &draft_with_doc("Second"), &scored_result(5, 5), date("2026-08-02"))
            .unwrap();

        assert_eq!(updated.training_history[0].title, "Second");
        assert_eq!(updated.training_history[1].title, "First");
        assert_eq!(updated.completed_trainings, 2);
    }

    #[test]
    fn failed_submission_stores_record_without_touching_counters() {
        let (store, company) = roster_env();
        let roster = Roster::new(&store, company);
        let employee = roster.add_employee(form("Sarah", "Production", Role::Employee)).unwrap();

        let result = scored_result(3, 5); // 60%, fails
        let updated = roster
            .record_quiz_submission(&employee.id, &draft_with_doc("Quality"), &result, date("2026-08-06"))
            .unwrap();

        assert_eq!(updated.completed_trainings, 0);
        assert!(updated.training_history.is_empty());
        assert!(!store.is_empty(), "the result record itself is persisted");
    }

    #[test]
    fn submission_for_unknown_employee_errors() {
        let (store, company) = roster_env();
        let roster = Roster::new(&store, company);
        let missing = Uuid::new_v4();

        let err = roster
            .record_quiz_submission(&missing, &draft_with_doc("X"), &scored_result(5, 5), date("2026-08-06"))
            .unwrap_err();
        assert!(matches!(err, RosterError::EmployeeNotFound(id) if id == missing));
    }

    #[test]
    fn invitation_redeems_once() {
        let (store, company) = roster_env();
        let roster = Roster::new(&store, company);

        let invitation = roster
            .create_invitation("new@acme.test", "New Hire", Role::Operator, "Production", "Line Operator", date("2026-08-01"))
            .unwrap();

        let employee = roster
            .redeem_invitation(&invitation.id, "es", date("2026-08-06"))
            .unwrap();
        assert_eq!(employee.role, Role::Operator);
        assert_eq!(employee.preferred_language, "es");

        let err = roster
            .redeem_invitation(&invitation.id, "es", date("2026-08-06"))
            .unwrap_err();
        assert!(matches!(err, RosterError::InvitationRedeemed(_)));
    }

    // ── Visibility ───────────────────────────────────────

    fn employee_in(department: &str, role: Role) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: department.into(),
            email: "x@acme.test".into(),
            department: department.into(),
            position: "p".into(),
            role,
            supervisor: None,
            supervises: vec![],
            preferred_language: "en".into(),
            hire_date: None,
            completed_trainings: 0,
            total_trainings: 0,
            last_training: None,
            performance: None,
            certifications: Default::default(),
            training_history: vec![],
            recommended_trainings: vec![],
        }
    }

    #[test]
    fn admin_sees_everyone() {
        let admin = employee_in("Management", Role::Admin);
        let all = vec![
            admin.clone(),
            employee_in("Production", Role::Operator),
            employee_in("Safety", Role::Supervisor),
        ];
        assert_eq!(visible_employees(&admin, &all).len(), 3);
    }

    #[test]
    fn supervisor_sees_department_and_direct_reports() {
        let mut supervisor = employee_in("Production", Role::Supervisor);
        let same_dept = employee_in("Production", Role::Operator);
        let other_dept = employee_in("Maintenance", Role::Technician);
        let supervised_elsewhere = employee_in("Safety", Role::Operator);
        supervisor.supervises.push(supervised_elsewhere.id);

        let all = vec![
            supervisor.clone(),
            same_dept.clone(),
            other_dept.clone(),
            supervised_elsewhere.clone(),
        ];
        let visible = visible_employees(&supervisor, &all);
        let ids: Vec<Uuid> = visible.iter().map(|e| e.id).collect();

        assert!(ids.contains(&supervisor.id));
        assert!(ids.contains(&same_dept.id));
        assert!(ids.contains(&supervised_elsewhere.id));
        assert!(!ids.contains(&other_dept.id));
    }

    #[test]
    fn operator_sees_only_themselves() {
        let operator = employee_in("Production", Role::Operator);
        let all = vec![operator.clone(), employee_in("Production", Role::Operator)];
        let visible = visible_employees(&operator, &all);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, operator.id);
    }

    // ── Dashboard stats ──────────────────────────────────

    #[test]
    fn dashboard_stats_aggregate() {
        let mut a = employee_in("Production", Role::Operator);
        a.completed_trainings = 8;
        a.total_trainings = 12;
        a.performance = Some(92);
        let mut b = employee_in("Safety", Role::Supervisor);
        b.completed_trainings = 6;
        b.total_trainings = 10;
        b.performance = None;

        let stats = dashboard_stats(&[a, b]);
        assert_eq!(stats.total_employees, 2);
        assert_eq!(stats.active_trainings, 8); // (12-8) + (10-6)
        assert_eq!(stats.avg_completion, 64); // round((67 + 60) / 2)
        assert_eq!(stats.avg_performance, 92, "only scored employees count");
    }

    #[test]
    fn dashboard_stats_empty_roster() {
        let stats = dashboard_stats(&[]);
        assert_eq!(stats.total_employees, 0);
        assert_eq!(stats.avg_completion, 0);
    }
}

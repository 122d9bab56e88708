//! Company-scoped document paths.
//!
//! Every entity lives under its company, so tenant isolation is carried in
//! the path itself: `companies/{companyId}/...`.

use std::fmt;

use uuid::Uuid;

/// An addressed location in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityPath(String);

impl EntityPath {
    /// Escape hatch for hosts with their own path scheme.
    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn company(company_id: &Uuid) -> EntityPath {
    EntityPath(format!("companies/{company_id}"))
}

pub fn employee(company_id: &Uuid, employee_id: &Uuid) -> EntityPath {
    EntityPath(format!("companies/{company_id}/employees/{employee_id}"))
}

pub fn training(company_id: &Uuid, training_id: &Uuid) -> EntityPath {
    EntityPath(format!("companies/{company_id}/trainings/{training_id}"))
}

pub fn quiz_result(company_id: &Uuid, result_id: &Uuid) -> EntityPath {
    EntityPath(format!("companies/{company_id}/quizResults/{result_id}"))
}

pub fn invitation(company_id: &Uuid, invitation_id: &Uuid) -> EntityPath {
    EntityPath(format!("companies/{company_id}/invitations/{invitation_id}"))
}

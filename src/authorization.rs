//! Role-based access as capability-set checks.
//!
//! Each role maps to an explicit set of granted capabilities; access checks
//! are set-membership tests, never string comparison on role names. Adding
//! a capability to a role means editing one table entry.

use crate::models::Role;

/// Actions the UI and services gate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// See every employee across all departments.
    ViewAllEmployees,
    /// See everyone in the holder's own department.
    ViewDepartment,
    ManageUsers,
    ManageSettings,
    CreateTraining,
    DeleteTraining,
    AssignTraining,
}

const ADMIN_CAPS: &[Capability] = &[
    Capability::ViewAllEmployees,
    Capability::ViewDepartment,
    Capability::ManageUsers,
    Capability::ManageSettings,
    Capability::CreateTraining,
    Capability::DeleteTraining,
    Capability::AssignTraining,
];

const MANAGER_CAPS: &[Capability] = &[
    Capability::ViewDepartment,
    Capability::CreateTraining,
    Capability::AssignTraining,
];

const LEAD_CAPS: &[Capability] = &[Capability::ViewDepartment, Capability::AssignTraining];

/// Capabilities granted to a role. Default-deny: roles not listed with a
/// capability simply do not have it.
pub fn capabilities(role: Role) -> &'static [Capability] {
    match role {
        Role::Admin => ADMIN_CAPS,
        Role::Manager | Role::Supervisor => MANAGER_CAPS,
        Role::Lead => LEAD_CAPS,
        Role::Technician | Role::Operator | Role::Employee => &[],
    }
}

/// Membership test for a single capability.
pub fn has_capability(role: Role, cap: Capability) -> bool {
    capabilities(role).contains(&cap)
}

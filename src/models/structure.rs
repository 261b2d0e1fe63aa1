//! Org structure payload: divisions, departments, roles and coordinators.

use serde::{Deserialize, Serialize};

use super::Department;

/// A top-level grouping of departments (e.g. Medical Services).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Division {
    #[serde(rename = "DivisionID")]
    pub division_id: i64,
    pub division_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division_head: Option<String>,
    #[serde(default)]
    pub department_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A budgeted position within a department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    #[serde(rename = "RoleID")]
    pub role_id: i64,
    pub role_title: String,
    #[serde(default, rename = "DepartmentID")]
    pub department_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_grade: Option<String>,
    #[serde(default)]
    pub headcount_budget: i64,
    #[serde(default)]
    pub filled_count: i64,
}

/// An employee assigned to coordinate an area across departments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Coordinator {
    #[serde(rename = "CoordinatorID")]
    pub coordinator_id: i64,
    pub coordinator_name: String,
    pub area: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Everything the hierarchy, divisions, roles and coordinators views need.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrgStructure {
    #[serde(default)]
    pub divisions: Vec<Division>,
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub coordinators: Vec<Coordinator>,
}

/// Flat staffing row shared by the functional summary and pay grade views.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct StaffingRow {
    pub department_name: String,
    pub role_title: String,
    #[serde(default)]
    pub headcount_budget: i64,
    #[serde(default)]
    pub filled_count: i64,
    #[serde(default)]
    pub vacant_count: i64,
    #[serde(default)]
    pub salary_grade: Option<String>,
    #[serde(default)]
    pub pay_grade_min: Option<i64>,
    #[serde(default)]
    pub pay_grade_max: Option<i64>,
    #[serde(default)]
    pub filled_cost: i64,
}

/// Row-level view selector for `GET /api/org-structure?view=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureView {
    Functional,
    PayGrade,
}

impl StructureView {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructureView::Functional => "functional",
            StructureView::PayGrade => "paygrade",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "functional" => Some(StructureView::Functional),
            "paygrade" => Some(StructureView::PayGrade),
            _ => None,
        }
    }
}

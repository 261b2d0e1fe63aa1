//! What happens after a click has been resolved to a [`TreeAction`].

use thiserror::Error;

use super::TreeAction;
use crate::client::OrgDataSource;
use crate::hierarchy::Forest;
use crate::render;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("department {0} is not in the current structure")]
    UnknownDepartment(i64),
    #[error("subtree of department {0} could not be serialized")]
    Export(i64),
}

/// Result of running a tree action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutput {
    /// Markup for the details or employees panel.
    Panel(String),
    /// The department and all of its descendants as JSON.
    Download { file_name: String, json: String },
}

impl TreeAction {
    pub fn department_id(&self) -> i64 {
        match *self {
            TreeAction::ViewDetails(id)
            | TreeAction::Export(id)
            | TreeAction::ShowEmployees(id) => id,
        }
    }

    /// Action named by a `data-action` value or URL segment.
    pub fn from_name(name: &str, department_id: i64) -> Option<TreeAction> {
        match name {
            "view" => Some(TreeAction::ViewDetails(department_id)),
            "export" => Some(TreeAction::Export(department_id)),
            "employees" => Some(TreeAction::ShowEmployees(department_id)),
            _ => None,
        }
    }
}

/// Run `action` against the forest currently on screen.
///
/// Only `ShowEmployees` fetches; details and export read the forest as is.
pub async fn handle_action(
    action: TreeAction,
    forest: &Forest,
    source: &dyn OrgDataSource,
) -> Result<ActionOutput, ActionError> {
    let id = action.department_id();
    let node = forest.find(id).ok_or(ActionError::UnknownDepartment(id))?;

    match action {
        TreeAction::ViewDetails(_) => {
            Ok(ActionOutput::Panel(render::render_department_details(node)))
        }
        TreeAction::ShowEmployees(_) => {
            let employees = source.employees(id).await;
            Ok(ActionOutput::Panel(render::render_employees(
                &node.department.department_name,
                &employees,
            )))
        }
        TreeAction::Export(_) => {
            let json = serde_json::to_string_pretty(node).map_err(|e| {
                tracing::error!(department_id = id, error = %e, "Failed to serialize subtree");
                ActionError::Export(id)
            })?;
            Ok(ActionOutput::Download {
                file_name: format!("{}.json", render::department_code(node)),
                json,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::hierarchy::build_forest;
    use crate::models::{
        Department, DepartmentType, Employee, OrgStructure, StaffingRow, StructureView,
    };

    #[derive(Default)]
    struct CountingSource {
        employee_calls: AtomicUsize,
    }

    #[async_trait]
    impl OrgDataSource for CountingSource {
        async fn org_structure(&self) -> OrgStructure {
            OrgStructure::default()
        }

        async fn staffing(&self, _view: StructureView) -> Vec<StaffingRow> {
            Vec::new()
        }

        async fn employees(&self, department_id: i64) -> Vec<Employee> {
            self.employee_calls.fetch_add(1, Ordering::SeqCst);
            vec![Employee {
                employee_id: department_id * 10,
                first_name: "Rosa".to_string(),
                last_name: "Villanueva".to_string(),
                job_title: Some("Head Nurse".to_string()),
                email: None,
            }]
        }
    }

    fn forest() -> Forest {
        let dept = |id: i64, parent: Option<i64>, name: &str, code: Option<&str>| Department {
            department_id: id,
            department_name: name.to_string(),
            department_code: code.map(str::to_string),
            parent_department_id: parent,
            department_type: DepartmentType::Clinical,
            manager_id: None,
            manager_name: None,
            employee_count: 2,
            description: None,
        };
        build_forest(&[
            dept(1, None, "Nursing Service", Some("NSG")),
            dept(2, Some(1), "Intensive Care Unit", None),
            dept(3, Some(2), "Neonatal ICU", None),
        ])
        .unwrap()
    }

    #[test]
    fn test_action_names() {
        assert_eq!(TreeAction::from_name("view", 3), Some(TreeAction::ViewDetails(3)));
        assert_eq!(TreeAction::from_name("export", 3), Some(TreeAction::Export(3)));
        assert_eq!(
            TreeAction::from_name("employees", 3),
            Some(TreeAction::ShowEmployees(3))
        );
        assert_eq!(TreeAction::from_name("delete", 3), None);
    }

    #[tokio::test]
    async fn test_show_employees_fetches_that_department() {
        let source = CountingSource::default();

        let output = handle_action(TreeAction::ShowEmployees(2), &forest(), &source)
            .await
            .unwrap();

        assert_eq!(source.employee_calls.load(Ordering::SeqCst), 1);
        let ActionOutput::Panel(html) = output else {
            panic!("expected a panel");
        };
        assert!(html.contains("<h3>Intensive Care Unit</h3>"));
        assert!(html.contains("Rosa Villanueva"));
        assert!(html.contains("Head Nurse"));
    }

    #[tokio::test]
    async fn test_view_details_reads_forest_only() {
        let source = CountingSource::default();

        let output = handle_action(TreeAction::ViewDetails(1), &forest(), &source)
            .await
            .unwrap();

        assert_eq!(source.employee_calls.load(Ordering::SeqCst), 0);
        let ActionOutput::Panel(html) = output else {
            panic!("expected a panel");
        };
        assert!(html.contains("org-details"));
        assert!(html.contains("Nursing Service"));
    }

    #[tokio::test]
    async fn test_export_serializes_subtree() {
        let source = CountingSource::default();

        let output = handle_action(TreeAction::Export(2), &forest(), &source)
            .await
            .unwrap();

        let ActionOutput::Download { file_name, json } = output else {
            panic!("expected a download");
        };
        assert_eq!(file_name, "D002.json");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["DepartmentName"], "Intensive Care Unit");
        assert_eq!(value["children"][0]["DepartmentID"], 3);
        assert_eq!(value["children"][0]["children"].as_array().unwrap().len(), 0);
        assert_eq!(source.employee_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_department() {
        let source = CountingSource::default();

        let err = handle_action(TreeAction::ShowEmployees(42), &forest(), &source)
            .await
            .unwrap_err();

        assert_eq!(err, ActionError::UnknownDepartment(42));
        assert_eq!(source.employee_calls.load(Ordering::SeqCst), 0);
    }
}

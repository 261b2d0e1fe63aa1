//! Department model matching the org structure payload.
//!
//! Field names follow the PascalCase column names the HR frontend already consumes.

use serde::{Deserialize, Serialize};

/// Organizational category of a department.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum DepartmentType {
    Executive,
    Clinical,
    Administrative,
    Support,
    Ancillary,
    /// Any type string outside the known set.
    #[default]
    #[serde(other)]
    Unknown,
}

impl DepartmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepartmentType::Executive => "Executive",
            DepartmentType::Clinical => "Clinical",
            DepartmentType::Administrative => "Administrative",
            DepartmentType::Support => "Support",
            DepartmentType::Ancillary => "Ancillary",
            DepartmentType::Unknown => "Unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "Executive" => DepartmentType::Executive,
            "Clinical" => DepartmentType::Clinical,
            "Administrative" => DepartmentType::Administrative,
            "Support" => DepartmentType::Support,
            "Ancillary" => DepartmentType::Ancillary,
            _ => DepartmentType::Unknown,
        }
    }
}

/// A single organizational unit as stored in the department table.
///
/// `parent_department_id` may be absent, `0`, or point at a department that is not
/// part of the loaded set; the hierarchy builder treats all three as roots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Department {
    #[serde(rename = "DepartmentID")]
    pub department_id: i64,
    pub department_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_code: Option<String>,
    #[serde(default, rename = "ParentDepartmentID")]
    pub parent_department_id: Option<i64>,
    #[serde(default)]
    pub department_type: DepartmentType,
    #[serde(default, rename = "ManagerID", skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub employee_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Department {
    /// The parent id if it is set and non-zero.
    pub fn parent_ref(&self) -> Option<i64> {
        self.parent_department_id.filter(|id| *id != 0)
    }
}

/// Form fields for creating or updating a department.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DepartmentForm {
    pub department_name: String,
    #[serde(default)]
    pub department_code: Option<String>,
    #[serde(default)]
    pub department_type: Option<DepartmentType>,
    #[serde(default, rename = "ParentDepartmentID")]
    pub parent_department_id: Option<i64>,
    #[serde(default, rename = "ManagerID")]
    pub manager_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One drag-and-drop reparent instruction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentMove {
    pub department_id: i64,
    pub new_parent_id: Option<i64>,
}

/// Request body for `POST /api/departments/reorder`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub moves: Vec<DepartmentMove>,
    /// Reject the batch if the structure changed since this revision.
    #[serde(
        rename = "expectedRevision",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_revision: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_deserializes_to_neutral() {
        let dept: Department = serde_json::from_value(serde_json::json!({
            "DepartmentID": 4,
            "DepartmentName": "Chaplaincy",
            "DepartmentType": "Pastoral"
        }))
        .unwrap();

        assert_eq!(dept.department_type, DepartmentType::Unknown);
        assert_eq!(dept.parent_department_id, None);
        assert_eq!(dept.employee_count, 0);
    }

    #[test]
    fn test_zero_parent_is_not_a_reference() {
        let dept: Department = serde_json::from_value(serde_json::json!({
            "DepartmentID": 1,
            "DepartmentName": "Office of the Director",
            "ParentDepartmentID": 0,
            "DepartmentType": "Executive"
        }))
        .unwrap();

        assert_eq!(dept.parent_ref(), None);
        assert_eq!(dept.department_type, DepartmentType::Executive);
    }

    #[test]
    fn test_type_parse_round_trips_known_names() {
        for ty in [
            DepartmentType::Executive,
            DepartmentType::Clinical,
            DepartmentType::Administrative,
            DepartmentType::Support,
            DepartmentType::Ancillary,
        ] {
            assert_eq!(DepartmentType::parse(ty.as_str()), ty);
        }
        assert_eq!(DepartmentType::parse("Nursing"), DepartmentType::Unknown);
    }

    #[test]
    fn test_reorder_request_wire_shape() {
        let request = ReorderRequest {
            moves: vec![DepartmentMove {
                department_id: 7,
                new_parent_id: None,
            }],
            expected_revision: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "moves": [{ "department_id": 7, "new_parent_id": null }] })
        );

        let parsed: ReorderRequest = serde_json::from_value(serde_json::json!({
            "moves": [],
            "expectedRevision": 3
        }))
        .unwrap();
        assert_eq!(parsed.expected_revision, Some(3));
    }
}

//! Default hospital structure used by the "Setup Hospital Structure" action.

use chrono::Utc;
use sqlx::{Sqlite, Transaction};

use crate::errors::AppError;
use crate::models::DepartmentType;

const DIVISIONS: [(&str, &str); 4] = [
    (
        "Office of the Medical Center Chief",
        "Executive leadership and strategic planning",
    ),
    ("Medical Services", "Clinical departments and ancillary diagnostics"),
    ("Nursing Services", "Inpatient and outpatient nursing care"),
    (
        "Hospital Operations and Patient Support",
        "Finance, HR, facilities and support services",
    ),
];

struct SeedDepartment {
    key: &'static str,
    name: &'static str,
    code: &'static str,
    ty: DepartmentType,
    parent: Option<&'static str>,
    division: usize,
}

const DEPARTMENTS: [SeedDepartment; 14] = [
    SeedDepartment {
        key: "mcc",
        name: "Office of the Medical Center Chief",
        code: "OMCC",
        ty: DepartmentType::Executive,
        parent: None,
        division: 0,
    },
    SeedDepartment {
        key: "med",
        name: "Medical Service",
        code: "MED",
        ty: DepartmentType::Clinical,
        parent: Some("mcc"),
        division: 1,
    },
    SeedDepartment {
        key: "nsg",
        name: "Nursing Service",
        code: "NSG",
        ty: DepartmentType::Clinical,
        parent: Some("mcc"),
        division: 2,
    },
    SeedDepartment {
        key: "hops",
        name: "Hospital Operations and Patient Support Service",
        code: "HOPSS",
        ty: DepartmentType::Support,
        parent: Some("mcc"),
        division: 3,
    },
    SeedDepartment {
        key: "fin",
        name: "Finance Service",
        code: "FIN",
        ty: DepartmentType::Administrative,
        parent: Some("mcc"),
        division: 3,
    },
    SeedDepartment {
        key: "im",
        name: "Department of Internal Medicine",
        code: "IM",
        ty: DepartmentType::Clinical,
        parent: Some("med"),
        division: 1,
    },
    SeedDepartment {
        key: "sur",
        name: "Department of Surgery",
        code: "SUR",
        ty: DepartmentType::Clinical,
        parent: Some("med"),
        division: 1,
    },
    SeedDepartment {
        key: "ped",
        name: "Department of Pediatrics",
        code: "PED",
        ty: DepartmentType::Clinical,
        parent: Some("med"),
        division: 1,
    },
    SeedDepartment {
        key: "lab",
        name: "Clinical Laboratory",
        code: "LAB",
        ty: DepartmentType::Ancillary,
        parent: Some("med"),
        division: 1,
    },
    SeedDepartment {
        key: "rad",
        name: "Radiology",
        code: "RAD",
        ty: DepartmentType::Ancillary,
        parent: Some("med"),
        division: 1,
    },
    SeedDepartment {
        key: "phr",
        name: "Pharmacy",
        code: "PHR",
        ty: DepartmentType::Ancillary,
        parent: Some("med"),
        division: 1,
    },
    SeedDepartment {
        key: "hrmo",
        name: "Human Resource Management Office",
        code: "HRMO",
        ty: DepartmentType::Administrative,
        parent: Some("hops"),
        division: 3,
    },
    SeedDepartment {
        key: "eng",
        name: "Engineering and Facilities Management",
        code: "EFMS",
        ty: DepartmentType::Support,
        parent: Some("hops"),
        division: 3,
    },
    SeedDepartment {
        key: "acc",
        name: "Accounting Section",
        code: "ACC",
        ty: DepartmentType::Administrative,
        parent: Some("fin"),
        division: 3,
    },
];

/// Insert divisions and departments; returns the number of departments created.
pub(super) async fn insert_default_structure(
    tx: &mut Transaction<'_, Sqlite>,
) -> Result<usize, AppError> {
    let now = Utc::now().to_rfc3339();

    let mut division_ids = Vec::with_capacity(DIVISIONS.len());
    for (name, description) in DIVISIONS {
        let result =
            sqlx::query("INSERT INTO divisions (division_name, description) VALUES (?, ?)")
                .bind(name)
                .bind(description)
                .execute(&mut **tx)
                .await?;
        division_ids.push(result.last_insert_rowid());
    }

    // parents are listed before their children
    let mut inserted: Vec<(&str, i64)> = Vec::with_capacity(DEPARTMENTS.len());
    for dept in &DEPARTMENTS {
        let parent_id = match dept.parent {
            Some(key) => Some(
                inserted
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, id)| *id)
                    .ok_or_else(|| AppError::Internal(format!("Seed parent {} missing", key)))?,
            ),
            None => None,
        };
        let result = sqlx::query(
            "INSERT INTO departments (department_name, department_code, department_type, parent_department_id, division_id, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(dept.name)
        .bind(dept.code)
        .bind(dept.ty.as_str())
        .bind(parent_id)
        .bind(division_ids[dept.division])
        .bind(&now)
        .execute(&mut **tx)
        .await?;
        inserted.push((dept.key, result.last_insert_rowid()));
    }

    Ok(inserted.len())
}

//! Database repository for the org structure and HMO read side.
//!
//! Uses prepared statements and transactions for data integrity.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use super::seed;
use crate::client::OrgDataSource;
use crate::errors::AppError;
use crate::hierarchy::{self, Forest};
use crate::models::{
    Coordinator, Department, DepartmentForm, DepartmentMove, DepartmentType, Division, Employee,
    HmoClaim, HmoEnrollment, HmoPlan, HmoSummary, OrgStructure, RevisionInfo, Role, StaffingRow,
    StructureView,
};

const DEPARTMENT_SELECT: &str = r#"
    SELECT d.department_id, d.department_name, d.department_code, d.department_type,
           d.parent_department_id, d.manager_id, d.description,
           m.first_name || ' ' || m.last_name AS manager_name,
           (SELECT COUNT(*) FROM employees e WHERE e.department_id = d.department_id) AS employee_count
    FROM departments d
    LEFT JOIN employees m ON m.employee_id = d.manager_id
"#;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    /// Everything the structure page needs in one payload.
    pub async fn get_org_structure(&self) -> Result<OrgStructure, AppError> {
        Ok(OrgStructure {
            divisions: self.list_divisions().await?,
            departments: self.list_departments().await?,
            roles: self.list_roles().await?,
            coordinators: self.list_coordinators().await?,
        })
    }

    // ==================== DEPARTMENT OPERATIONS ====================

    /// List all departments ordered by name.
    pub async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        let rows = sqlx::query(&format!("{DEPARTMENT_SELECT} ORDER BY d.department_name"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(department_from_row).collect())
    }

    /// Get a department by ID.
    pub async fn get_department(&self, id: i64) -> Result<Option<Department>, AppError> {
        let row = sqlx::query(&format!("{DEPARTMENT_SELECT} WHERE d.department_id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(department_from_row))
    }

    /// Current departments assembled into a forest.
    pub async fn department_forest(&self) -> Result<Forest, AppError> {
        let departments = self.list_departments().await?;
        Ok(hierarchy::build_forest(&departments)?)
    }

    async fn department_exists(&self, id: i64) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM departments WHERE department_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("n") > 0)
    }

    /// Create a new department.
    pub async fn create_department(&self, form: &DepartmentForm) -> Result<Department, AppError> {
        let parent = form.parent_department_id.filter(|id| *id != 0);
        if let Some(parent) = parent {
            if !self.department_exists(parent).await? {
                return Err(AppError::Validation(format!(
                    "Parent department {} does not exist",
                    parent
                )));
            }
        }

        let now = Utc::now().to_rfc3339();
        let department_type = form
            .department_type
            .unwrap_or(DepartmentType::Administrative);

        let result = sqlx::query(
            "INSERT INTO departments (department_name, department_code, department_type, parent_department_id, manager_id, description, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(form.department_name.trim())
        .bind(&form.department_code)
        .bind(department_type.as_str())
        .bind(parent)
        .bind(form.manager_id)
        .bind(&form.description)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        let id = result.last_insert_rowid();
        tracing::info!(department_id = id, "Created department");
        self.get_department(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Department {} vanished after insert", id)))
    }

    /// Update a department. A parent change must keep the tree acyclic.
    pub async fn update_department(
        &self,
        id: i64,
        form: &DepartmentForm,
    ) -> Result<Department, AppError> {
        let departments = self.list_departments().await?;
        let existing = departments
            .iter()
            .find(|d| d.department_id == id)
            .ok_or_else(|| AppError::NotFound(format!("Department {} not found", id)))?;

        let parent = form.parent_department_id.filter(|p| *p != 0);
        if parent != existing.parent_ref() {
            hierarchy::apply_moves(
                &departments,
                &[DepartmentMove {
                    department_id: id,
                    new_parent_id: parent,
                }],
            )?;
        }

        let now = Utc::now().to_rfc3339();
        let department_type = form.department_type.unwrap_or(existing.department_type);

        sqlx::query(
            "UPDATE departments SET department_name = ?, department_code = ?, department_type = ?, parent_department_id = ?, manager_id = ?, description = ?, updated_at = ? WHERE department_id = ?"
        )
        .bind(form.department_name.trim())
        .bind(&form.department_code)
        .bind(department_type.as_str())
        .bind(parent)
        .bind(form.manager_id)
        .bind(&form.description)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        self.get_department(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Department {} not found", id)))
    }

    /// Apply a batch of reparent moves atomically.
    ///
    /// Moves are validated against the full department set inside the transaction, so
    /// a batch that would leave a cycle or point at a missing parent changes nothing.
    pub async fn reorder_departments(
        &self,
        moves: &[DepartmentMove],
        expected_revision: Option<i64>,
    ) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        if let Some(expected) = expected_revision {
            let current: i64 = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
                .fetch_one(&mut *tx)
                .await?
                .get("revision_id");
            if current != expected {
                return Err(AppError::Conflict {
                    message: format!(
                        "Revision mismatch: expected {}, current {}",
                        expected, current
                    ),
                    current_revision: current,
                });
            }
        }

        let departments = load_departments(&mut tx).await?;
        let (updated, _) = hierarchy::apply_moves(&departments, moves)?;

        let now = Utc::now().to_rfc3339();
        for mv in moves {
            let new_parent = updated
                .iter()
                .find(|d| d.department_id == mv.department_id)
                .and_then(|d| d.parent_department_id);
            sqlx::query(
                "UPDATE departments SET parent_department_id = ?, updated_at = ? WHERE department_id = ?",
            )
            .bind(new_parent)
            .bind(&now)
            .bind(mv.department_id)
            .execute(&mut *tx)
            .await?;
        }

        // Increment revision once for the entire batch
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(moves = moves.len(), "Reparented departments");
        self.get_revision_id().await
    }

    /// Seed the default hospital structure into an empty database.
    pub async fn setup_default_structure(&self) -> Result<usize, AppError> {
        let existing: i64 = sqlx::query("SELECT COUNT(*) AS n FROM departments")
            .fetch_one(&self.pool)
            .await?
            .get("n");
        if existing > 0 {
            return Err(AppError::AlreadyExists(format!(
                "Hospital structure already has {} departments",
                existing
            )));
        }

        let mut tx = self.pool.begin().await?;
        let created = seed::insert_default_structure(&mut tx).await?;
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(departments = created, "Seeded default hospital structure");
        Ok(created)
    }

    // ==================== STRUCTURE OPERATIONS ====================

    pub async fn list_divisions(&self) -> Result<Vec<Division>, AppError> {
        let rows = sqlx::query(
            r#"SELECT v.division_id, v.division_name, v.division_head, v.description,
                      (SELECT COUNT(*) FROM departments d WHERE d.division_id = v.division_id) AS department_count
               FROM divisions v ORDER BY v.division_name"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Division {
                division_id: row.get("division_id"),
                division_name: row.get("division_name"),
                division_head: row.get("division_head"),
                department_count: row.get("department_count"),
                description: row.get("description"),
            })
            .collect())
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let rows = sqlx::query(
            r#"SELECT r.role_id, r.role_title, r.department_id, d.department_name,
                      r.salary_grade, r.headcount_budget,
                      (SELECT COUNT(*) FROM employees e WHERE e.role_id = r.role_id) AS filled_count
               FROM roles r LEFT JOIN departments d ON d.department_id = r.department_id
               ORDER BY r.role_title"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Role {
                role_id: row.get("role_id"),
                role_title: row.get("role_title"),
                department_id: row.get("department_id"),
                department_name: row.get("department_name"),
                salary_grade: row.get("salary_grade"),
                headcount_budget: row.get("headcount_budget"),
                filled_count: row.get("filled_count"),
            })
            .collect())
    }

    pub async fn list_coordinators(&self) -> Result<Vec<Coordinator>, AppError> {
        let rows = sqlx::query(
            r#"SELECT c.coordinator_id, c.area, e.first_name || ' ' || e.last_name AS coordinator_name,
                      e.email, d.department_name
               FROM coordinators c
               JOIN employees e ON e.employee_id = c.employee_id
               LEFT JOIN departments d ON d.department_id = c.department_id
               ORDER BY c.area"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Coordinator {
                coordinator_id: row.get("coordinator_id"),
                coordinator_name: row.get("coordinator_name"),
                area: row.get("area"),
                department_name: row.get("department_name"),
                email: row.get("email"),
            })
            .collect())
    }

    /// Staffing rows for the functional summary or pay grade view.
    pub async fn list_staffing(&self, view: StructureView) -> Result<Vec<StaffingRow>, AppError> {
        let order = match view {
            StructureView::Functional => "d.department_name, r.role_title",
            StructureView::PayGrade => "r.salary_grade, r.role_title",
        };
        let rows = sqlx::query(&format!(
            r#"SELECT d.department_name, r.role_title, r.headcount_budget, r.salary_grade,
                      r.pay_grade_min, r.pay_grade_max,
                      (SELECT COUNT(*) FROM employees e WHERE e.role_id = r.role_id) AS filled_count,
                      (SELECT COALESCE(SUM(e.monthly_salary), 0) FROM employees e WHERE e.role_id = r.role_id) AS filled_cost
               FROM roles r JOIN departments d ON d.department_id = r.department_id
               ORDER BY {order}"#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(staffing_from_row).collect())
    }

    /// Employees assigned to a department.
    pub async fn list_employees(&self, department_id: i64) -> Result<Vec<Employee>, AppError> {
        let rows = sqlx::query(
            "SELECT employee_id, first_name, last_name, job_title, email FROM employees WHERE department_id = ? ORDER BY last_name, first_name",
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Employee {
                employee_id: row.get("employee_id"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                job_title: row.get("job_title"),
                email: row.get("email"),
            })
            .collect())
    }

    // ==================== HMO OPERATIONS ====================

    pub async fn list_plans(&self) -> Result<Vec<HmoPlan>, AppError> {
        let rows = sqlx::query("SELECT id, name, provider, monthly_premium FROM hmo_plans ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| HmoPlan {
                id: row.get("id"),
                name: row.get("name"),
                provider: row.get("provider"),
                monthly_premium: row.get("monthly_premium"),
            })
            .collect())
    }

    pub async fn list_enrollments(&self) -> Result<Vec<HmoEnrollment>, AppError> {
        let rows = sqlx::query(
            "SELECT id, employee_id, plan_id, status, monthly_contribution FROM hmo_enrollments ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| HmoEnrollment {
                id: row.get("id"),
                employee_id: row.get("employee_id"),
                plan_id: row.get("plan_id"),
                status: row.get("status"),
                monthly_contribution: row.get("monthly_contribution"),
            })
            .collect())
    }

    pub async fn list_claims(&self) -> Result<Vec<HmoClaim>, AppError> {
        let rows = sqlx::query(
            "SELECT id, claim_number, enrollment_id, amount, status, submitted_at, approved_at FROM hmo_claims ORDER BY submitted_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| HmoClaim {
                id: row.get("id"),
                claim_number: row.get("claim_number"),
                enrollment_id: row.get("enrollment_id"),
                amount: row.get("amount"),
                status: row.get("status"),
                submitted_at: row.get("submitted_at"),
                approved_at: row.get("approved_at"),
            })
            .collect())
    }

    /// Dashboard aggregate over all enrollments and claims.
    pub async fn hmo_summary(&self) -> Result<HmoSummary, AppError> {
        let enrollments = self.list_enrollments().await?;
        let claims = self.list_claims().await?;
        Ok(HmoSummary::aggregate(&enrollments, &claims))
    }
}

#[async_trait]
impl OrgDataSource for Repository {
    async fn org_structure(&self) -> OrgStructure {
        self.get_org_structure().await.unwrap_or_else(|e| {
            tracing::warn!("Failed to load org structure: {}", e);
            OrgStructure::default()
        })
    }

    async fn staffing(&self, view: StructureView) -> Vec<StaffingRow> {
        self.list_staffing(view).await.unwrap_or_else(|e| {
            tracing::warn!("Failed to load {} rows: {}", view.as_str(), e);
            Vec::new()
        })
    }

    async fn employees(&self, department_id: i64) -> Vec<Employee> {
        self.list_employees(department_id).await.unwrap_or_else(|e| {
            tracing::warn!("Failed to load employees for {}: {}", department_id, e);
            Vec::new()
        })
    }
}

async fn load_departments(tx: &mut Transaction<'_, Sqlite>) -> Result<Vec<Department>, AppError> {
    let rows = sqlx::query(&format!("{DEPARTMENT_SELECT} ORDER BY d.department_name"))
        .fetch_all(&mut **tx)
        .await?;
    Ok(rows.iter().map(department_from_row).collect())
}

// Helper functions for row conversion

fn department_from_row(row: &sqlx::sqlite::SqliteRow) -> Department {
    let department_type: String = row.get("department_type");
    Department {
        department_id: row.get("department_id"),
        department_name: row.get("department_name"),
        department_code: row.get("department_code"),
        parent_department_id: row.get("parent_department_id"),
        department_type: DepartmentType::parse(&department_type),
        manager_id: row.get("manager_id"),
        manager_name: row.get("manager_name"),
        employee_count: row.get("employee_count"),
        description: row.get("description"),
    }
}

fn staffing_from_row(row: &sqlx::sqlite::SqliteRow) -> StaffingRow {
    let headcount_budget: i64 = row.get("headcount_budget");
    let filled_count: i64 = row.get("filled_count");
    StaffingRow {
        department_name: row.get("department_name"),
        role_title: row.get("role_title"),
        headcount_budget,
        filled_count,
        vacant_count: (headcount_budget - filled_count).max(0),
        salary_grade: row.get("salary_grade"),
        pay_grade_min: row.get("pay_grade_min"),
        pay_grade_max: row.get("pay_grade_max"),
        filled_cost: row.get("filled_cost"),
    }
}

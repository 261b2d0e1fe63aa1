//! Tabular views: divisions, roles, coordinators, staffing summaries and employees.

use super::escape;
use crate::models::{Coordinator, Division, Employee, Role, StaffingRow};
use crate::paygrade;

fn empty_state(message: &str) -> String {
    format!(
        "<div class=\"org-empty-state\"><p>{}</p></div>",
        escape(message)
    )
}

fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut out = String::from("<table class=\"org-table\"><thead><tr>");
    for header in headers {
        out.push_str(&format!("<th>{header}</th>"));
    }
    out.push_str("</tr></thead><tbody>");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{cell}</td>"));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

fn opt(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .map(escape)
        .unwrap_or_else(|| "-".to_string())
}

pub fn render_divisions(divisions: &[Division]) -> String {
    if divisions.is_empty() {
        return empty_state("No divisions configured.");
    }
    let rows = divisions
        .iter()
        .map(|d| {
            vec![
                escape(&d.division_name),
                opt(d.division_head.as_deref()),
                d.department_count.to_string(),
                opt(d.description.as_deref()),
            ]
        })
        .collect();
    table(&["Division", "Head", "Departments", "Description"], rows)
}

pub fn render_roles(roles: &[Role]) -> String {
    if roles.is_empty() {
        return empty_state("No roles configured.");
    }
    let rows = roles
        .iter()
        .map(|r| {
            vec![
                escape(&r.role_title),
                opt(r.department_name.as_deref()),
                opt(r.salary_grade.as_deref()),
                r.headcount_budget.to_string(),
                r.filled_count.to_string(),
                (r.headcount_budget - r.filled_count).max(0).to_string(),
            ]
        })
        .collect();
    table(
        &["Role", "Department", "Salary Grade", "Budget", "Filled", "Vacant"],
        rows,
    )
}

pub fn render_coordinators(coordinators: &[Coordinator]) -> String {
    if coordinators.is_empty() {
        return empty_state("No coordinators assigned.");
    }
    let mut out = String::from("<ul class=\"org-coordinators\">");
    for c in coordinators {
        out.push_str(&format!(
            "<li><strong>{}</strong> <span class=\"org-coordinator-area\">{}</span>",
            escape(&c.coordinator_name),
            escape(&c.area)
        ));
        if let Some(dept) = c.department_name.as_deref() {
            out.push_str(&format!(
                " <span class=\"org-coordinator-dept\">{}</span>",
                escape(dept)
            ));
        }
        if let Some(email) = c.email.as_deref() {
            out.push_str(&format!(
                " <a href=\"mailto:{0}\">{0}</a>",
                escape(email)
            ));
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

/// Headcount totals for one department in the functional summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionalTotals {
    pub department_name: String,
    pub headcount_budget: i64,
    pub filled: i64,
    pub vacant: i64,
    pub filled_cost: i64,
}

/// Group staffing rows by department, keeping first-seen department order.
pub fn functional_totals(rows: &[StaffingRow]) -> Vec<FunctionalTotals> {
    let mut totals: Vec<FunctionalTotals> = Vec::new();
    for row in rows {
        let index = match totals
            .iter()
            .position(|t| t.department_name == row.department_name)
        {
            Some(index) => index,
            None => {
                totals.push(FunctionalTotals {
                    department_name: row.department_name.clone(),
                    ..Default::default()
                });
                totals.len() - 1
            }
        };
        let entry = &mut totals[index];
        entry.headcount_budget += row.headcount_budget;
        entry.filled += row.filled_count;
        entry.vacant += row.vacant_count;
        entry.filled_cost += row.filled_cost;
    }
    totals
}

pub fn render_functional(rows: &[StaffingRow]) -> String {
    if rows.is_empty() {
        return empty_state("No staffing data available.");
    }
    let mut out = String::from("<div class=\"org-functional\">");
    for totals in functional_totals(rows) {
        out.push_str(&format!(
            "<h4>{} <small>{} budgeted / {} filled / {} vacant / {} monthly</small></h4>",
            escape(&totals.department_name),
            totals.headcount_budget,
            totals.filled,
            totals.vacant,
            paygrade::format_peso(Some(totals.filled_cost))
        ));
        let roles = rows
            .iter()
            .filter(|r| r.department_name == totals.department_name)
            .map(|r| {
                vec![
                    escape(&r.role_title),
                    r.headcount_budget.to_string(),
                    r.filled_count.to_string(),
                    r.vacant_count.to_string(),
                ]
            })
            .collect();
        out.push_str(&table(&["Role", "Budget", "Filled", "Vacant"], roles));
    }
    out.push_str("</div>");
    out
}

pub fn render_pay_grades(rows: &[StaffingRow]) -> String {
    if rows.is_empty() {
        return empty_state("No pay grade data available.");
    }
    let rows = rows
        .iter()
        .map(|r| {
            let range = paygrade::resolve(r.salary_grade.as_deref(), r.pay_grade_min, r.pay_grade_max);
            vec![
                escape(&r.role_title),
                escape(&r.department_name),
                opt(r.salary_grade.as_deref()),
                paygrade::format_range(range),
                r.filled_count.to_string(),
                paygrade::format_peso(Some(r.filled_cost)),
            ]
        })
        .collect();
    table(
        &["Role", "Department", "Salary Grade", "Monthly Range", "Filled", "Filled Cost"],
        rows,
    )
}

/// Employee list shown when a department node is clicked.
pub fn render_employees(department_name: &str, employees: &[Employee]) -> String {
    let mut out = format!(
        "<div class=\"org-employees\"><h3>{}</h3>",
        escape(department_name)
    );
    if employees.is_empty() {
        out.push_str("<p>No employees assigned to this department.</p></div>");
        return out;
    }
    let rows = employees
        .iter()
        .map(|e| {
            vec![
                escape(&e.full_name()),
                opt(e.job_title.as_deref()),
                opt(e.email.as_deref()),
            ]
        })
        .collect();
    out.push_str(&table(&["Name", "Job Title", "Email"], rows));
    out.push_str("</div>");
    out
}

//! Tab dispatch for the org structure page.
//!
//! The current tab lives in an explicit [`ViewState`] value instead of page-global
//! state. Each view fetches its own data on every switch.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::client::OrgDataSource;
use crate::hierarchy::build_forest;
use crate::interaction::Viewport;
use crate::models::StructureView;
use crate::render;

/// Attempts made after the first failed mount lookup.
pub const MOUNT_RETRIES: u32 = 3;
pub const MOUNT_RETRY_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Hierarchy,
    Divisions,
    Roles,
    Coordinators,
    Functional,
    PayGrade,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Hierarchy,
        View::Divisions,
        View::Roles,
        View::Coordinators,
        View::Functional,
        View::PayGrade,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Hierarchy => "hierarchy",
            View::Divisions => "divisions",
            View::Roles => "roles",
            View::Coordinators => "coordinators",
            View::Functional => "functional",
            View::PayGrade => "paygrade",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Hierarchy => "Hierarchy",
            View::Divisions => "Divisions",
            View::Roles => "Roles",
            View::Coordinators => "Coordinators",
            View::Functional => "Functional Summary",
            View::PayGrade => "Pay Grade",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("unknown view '{0}'")]
    UnknownView(String),
}

impl FromStr for View {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ViewError::UnknownView(s.to_string()))
    }
}

/// Which tab is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    pub current: Option<View>,
}

impl ViewState {
    /// Select `name`, leaving the state untouched on an unknown name.
    pub fn switch(self, name: &str) -> Result<(ViewState, View), ViewError> {
        let view: View = name.parse()?;
        Ok((
            ViewState {
                current: Some(view),
            },
            view,
        ))
    }
}

/// Tab bar with `active` marked.
pub fn render_tabs(active: View) -> String {
    let mut out = String::from("<div class=\"org-tabs\" role=\"tablist\">");
    for view in View::ALL {
        let class = if view == active {
            "org-tab active"
        } else {
            "org-tab"
        };
        out.push_str(&format!(
            "<button type=\"button\" class=\"{}\" data-view=\"{}\" aria-selected=\"{}\">{}</button>",
            class,
            view.as_str(),
            view == active,
            view.label()
        ));
    }
    out.push_str("</div>");
    out
}

/// Fetch and render the content of one view.
pub async fn render_view(view: View, source: &dyn OrgDataSource, viewport: &Viewport) -> String {
    match view {
        View::Hierarchy => {
            let structure = source.org_structure().await;
            match build_forest(&structure.departments) {
                Ok(forest) => render::render_hierarchy(&forest, viewport),
                Err(e) => {
                    tracing::error!(error = %e, "Department hierarchy is invalid");
                    render::render_hierarchy_error(&e)
                }
            }
        }
        View::Divisions => render::render_divisions(&source.org_structure().await.divisions),
        View::Roles => render::render_roles(&source.org_structure().await.roles),
        View::Coordinators => {
            render::render_coordinators(&source.org_structure().await.coordinators)
        }
        View::Functional => {
            render::render_functional(&source.staffing(StructureView::Functional).await)
        }
        View::PayGrade => {
            render::render_pay_grades(&source.staffing(StructureView::PayGrade).await)
        }
    }
}

/// Switch to `name` and render the whole tab area for it.
pub async fn show(
    state: ViewState,
    name: &str,
    source: &dyn OrgDataSource,
) -> Result<(ViewState, String), ViewError> {
    let (state, view) = state.switch(name)?;
    let content = render_view(view, source, &Viewport::default()).await;
    let html = format!(
        "{}<div class=\"org-view-content\" data-view=\"{}\">{}</div>",
        render_tabs(view),
        view.as_str(),
        content
    );
    Ok((state, html))
}

/// Poll `probe` until it yields a mount point, retrying a fixed number of times.
pub async fn await_mount<T, F>(mut probe: F) -> Option<T>
where
    F: FnMut() -> Option<T>,
{
    if let Some(found) = probe() {
        return Some(found);
    }
    for attempt in 1..=MOUNT_RETRIES {
        tokio::time::sleep(MOUNT_RETRY_DELAY).await;
        if let Some(found) = probe() {
            return Some(found);
        }
        tracing::debug!(attempt, "Mount point not available yet");
    }
    tracing::debug!("Mount point never appeared, skipping render");
    None
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::models::{Department, DepartmentType, Employee, OrgStructure, StaffingRow};

    #[derive(Default)]
    struct CountingSource {
        structure_calls: AtomicUsize,
        staffing_calls: AtomicUsize,
        departments: Vec<Department>,
    }

    #[async_trait]
    impl OrgDataSource for CountingSource {
        async fn org_structure(&self) -> OrgStructure {
            self.structure_calls.fetch_add(1, Ordering::SeqCst);
            OrgStructure {
                departments: self.departments.clone(),
                ..Default::default()
            }
        }

        async fn staffing(&self, view: StructureView) -> Vec<StaffingRow> {
            self.staffing_calls.fetch_add(1, Ordering::SeqCst);
            vec![StaffingRow {
                department_name: "Nursing".to_string(),
                role_title: format!("{} role", view.as_str()),
                salary_grade: Some("SG10".to_string()),
                ..Default::default()
            }]
        }

        async fn employees(&self, _department_id: i64) -> Vec<Employee> {
            Vec::new()
        }
    }

    fn dept(id: i64, parent: Option<i64>) -> Department {
        Department {
            department_id: id,
            department_name: format!("Dept {id}"),
            department_code: None,
            parent_department_id: parent,
            department_type: DepartmentType::Support,
            manager_id: None,
            manager_name: None,
            employee_count: 0,
            description: None,
        }
    }

    #[test]
    fn test_parse_all_views() {
        for view in View::ALL {
            assert_eq!(view.as_str().parse::<View>(), Ok(view));
        }
        assert_eq!(
            "payroll".parse::<View>(),
            Err(ViewError::UnknownView("payroll".to_string()))
        );
    }

    #[test]
    fn test_switch_updates_state() {
        let state = ViewState::default();
        let (state, view) = state.switch("roles").unwrap();
        assert_eq!(view, View::Roles);
        assert_eq!(state.current, Some(View::Roles));

        assert!(state.switch("nope").is_err());
        assert_eq!(state.current, Some(View::Roles));
    }

    #[test]
    fn test_tabs_mark_only_active() {
        let html = render_tabs(View::Functional);
        assert_eq!(html.matches("org-tab active").count(), 1);
        assert!(html.contains("class=\"org-tab active\" data-view=\"functional\""));
    }

    #[tokio::test]
    async fn test_switch_to_paygrade_fetches_only_staffing() {
        let source = CountingSource::default();

        let (state, html) = show(ViewState::default(), "paygrade", &source).await.unwrap();

        assert_eq!(state.current, Some(View::PayGrade));
        assert_eq!(source.staffing_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.structure_calls.load(Ordering::SeqCst), 0);
        assert!(html.contains("data-view=\"paygrade\">"));
        assert!(html.contains("₱25,586 - ₱28,504"));
    }

    #[tokio::test]
    async fn test_switching_back_refetches() {
        let source = CountingSource {
            departments: vec![dept(1, None), dept(2, Some(1))],
            ..Default::default()
        };

        let (state, _) = show(ViewState::default(), "hierarchy", &source).await.unwrap();
        let (state, _) = show(state, "functional", &source).await.unwrap();
        let (state, html) = show(state, "hierarchy", &source).await.unwrap();

        assert_eq!(state.current, Some(View::Hierarchy));
        assert_eq!(source.structure_calls.load(Ordering::SeqCst), 2);
        assert_eq!(source.staffing_calls.load(Ordering::SeqCst), 1);
        assert!(html.contains("data-department-id=\"2\""));
    }

    #[tokio::test]
    async fn test_unknown_view_renders_nothing() {
        let source = CountingSource::default();

        let result = show(ViewState::default(), "benefits", &source).await;

        assert!(matches!(result, Err(ViewError::UnknownView(_))));
        assert_eq!(source.structure_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_hierarchy_offers_setup() {
        let source = CountingSource::default();
        let (_, html) = show(ViewState::default(), "hierarchy", &source).await.unwrap();
        assert!(html.contains("Setup Hospital Structure"));
    }

    #[tokio::test]
    async fn test_cyclic_rows_render_error_block() {
        let source = CountingSource {
            departments: vec![dept(1, Some(2)), dept(2, Some(1))],
            ..Default::default()
        };
        let (_, html) = show(ViewState::default(), "hierarchy", &source).await.unwrap();
        assert!(html.contains("org-error"));
        assert!(!html.contains("org-node"));
    }

    #[tokio::test]
    async fn test_await_mount_retries_then_succeeds() {
        let mut calls = 0;
        let found = await_mount(|| {
            calls += 1;
            (calls == 3).then_some("org-structure-content")
        })
        .await;

        assert_eq!(found, Some("org-structure-content"));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_await_mount_gives_up() {
        let mut calls = 0;
        let found: Option<()> = await_mount(|| {
            calls += 1;
            None
        })
        .await;

        assert_eq!(found, None);
        assert_eq!(calls, 1 + MOUNT_RETRIES);
    }
}

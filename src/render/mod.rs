//! HTML rendering for the org structure views.
//!
//! Everything here is pure string construction. Actions are declared through
//! `data-action` / `data-department-id` attributes and resolved by
//! [`crate::interaction::delegate_click`].

mod tables;

pub use tables::*;

use crate::hierarchy::{DepartmentNode, Forest, HierarchyError};
use crate::interaction::Viewport;
use crate::models::DepartmentType;

/// Horizontal indent applied per nesting level.
pub const INDENT_PX: usize = 24;

/// Element id of the pan/zoom container.
pub const TREE_CONTAINER_ID: &str = "org-tree-container";

/// Badge colour and icon for a department type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeStyle {
    pub color: &'static str,
    pub icon: &'static str,
}

pub fn type_style(ty: DepartmentType) -> TypeStyle {
    match ty {
        DepartmentType::Executive => TypeStyle {
            color: "#7c3aed",
            icon: "fa-crown",
        },
        DepartmentType::Clinical => TypeStyle {
            color: "#dc2626",
            icon: "fa-user-md",
        },
        DepartmentType::Administrative => TypeStyle {
            color: "#2563eb",
            icon: "fa-briefcase",
        },
        DepartmentType::Support => TypeStyle {
            color: "#059669",
            icon: "fa-hands-helping",
        },
        DepartmentType::Ancillary => TypeStyle {
            color: "#d97706",
            icon: "fa-flask",
        },
        DepartmentType::Unknown => TypeStyle {
            color: "#6b7280",
            icon: "fa-building",
        },
    }
}

pub(crate) fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Display code for a department, falling back to its zero-padded id.
pub fn department_code(node: &DepartmentNode) -> String {
    match node.department.department_code.as_deref() {
        Some(code) if !code.trim().is_empty() => code.to_string(),
        _ => format!("D{:03}", node.id()),
    }
}

/// Render every tree of the forest, roots at level 0.
pub fn render_forest(forest: &Forest) -> String {
    let mut out = String::new();
    render_nodes(&forest.roots, 0, &mut out);
    out
}

fn render_nodes(nodes: &[DepartmentNode], level: usize, out: &mut String) {
    for node in nodes {
        render_node(node, level, out);
    }
}

fn render_node(node: &DepartmentNode, level: usize, out: &mut String) {
    let dept = &node.department;
    let style = type_style(dept.department_type);
    let id = node.id();

    out.push_str(&format!(
        "<div class=\"org-node\" data-department-id=\"{}\" data-level=\"{}\" draggable=\"true\">",
        id, level
    ));
    out.push_str(&format!(
        "<div class=\"org-node-card\" style=\"border-left: 4px solid {}\">",
        style.color
    ));

    out.push_str("<div class=\"org-node-header\">");
    out.push_str(&format!(
        "<i class=\"fas {}\" style=\"color: {}\"></i>",
        style.icon, style.color
    ));
    out.push_str(&format!(
        "<span class=\"org-node-name\">{}</span>",
        escape(&dept.department_name)
    ));
    out.push_str(&format!(
        "<span class=\"org-node-badge\" style=\"background: {}\">{}</span>",
        style.color,
        dept.department_type.as_str()
    ));
    out.push_str("</div>");

    out.push_str("<div class=\"org-node-meta\">");
    out.push_str(&format!(
        "<span class=\"org-node-code\">{}</span>",
        escape(&department_code(node))
    ));
    out.push_str(&format!(
        "<span class=\"org-node-count\">{} {}</span>",
        dept.employee_count,
        if dept.employee_count == 1 {
            "employee"
        } else {
            "employees"
        }
    ));
    if !node.children.is_empty() {
        out.push_str(&format!(
            "<span class=\"org-node-units\">{} sub-units</span>",
            node.children.len()
        ));
    }
    if let Some(manager) = dept.manager_name.as_deref().filter(|m| !m.is_empty()) {
        out.push_str(&format!(
            "<span class=\"org-node-manager\">Manager: {}</span>",
            escape(manager)
        ));
    }
    out.push_str("</div>");

    if let Some(description) = dept.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!(
            "<p class=\"org-node-description\">{}</p>",
            escape(description)
        ));
    }

    out.push_str("<div class=\"org-node-actions\">");
    out.push_str(&format!(
        "<button type=\"button\" class=\"org-action-view\" data-action=\"view\" data-department-id=\"{id}\" title=\"View details\"><i class=\"fas fa-eye\"></i></button>"
    ));
    out.push_str(&format!(
        "<button type=\"button\" class=\"org-action-export\" data-action=\"export\" data-department-id=\"{id}\" title=\"Export\"><i class=\"fas fa-download\"></i></button>"
    ));
    out.push_str("</div>");
    out.push_str("</div>");

    if !node.children.is_empty() {
        // Each nesting step adds one fixed indent.
        out.push_str(&format!(
            "<div class=\"org-node-children\" style=\"margin-left: {INDENT_PX}px\">"
        ));
        render_nodes(&node.children, level + 1, out);
        out.push_str("</div>");
    }

    out.push_str("</div>");
}

/// Empty-state block offered when no departments exist.
pub fn render_empty_hierarchy() -> String {
    concat!(
        "<div class=\"org-empty-state\">",
        "<i class=\"fas fa-sitemap\"></i>",
        "<h3>No departments found</h3>",
        "<p>Set up the hospital structure to start building the organization chart.</p>",
        "<button type=\"button\" class=\"org-setup-btn\" data-action=\"setup\">Setup Hospital Structure</button>",
        "</div>"
    )
    .to_string()
}

/// Full hierarchy view: zoom controls, orphan notice and the pan/zoom container.
pub fn render_hierarchy(forest: &Forest, viewport: &Viewport) -> String {
    if forest.is_empty() {
        return render_empty_hierarchy();
    }

    let mut out = String::from("<div class=\"org-hierarchy\">");
    out.push_str("<div class=\"org-zoom-controls\">");
    out.push_str("<button type=\"button\" data-zoom=\"in\" title=\"Zoom in\"><i class=\"fas fa-search-plus\"></i></button>");
    out.push_str("<button type=\"button\" data-zoom=\"out\" title=\"Zoom out\"><i class=\"fas fa-search-minus\"></i></button>");
    out.push_str("<button type=\"button\" data-zoom=\"reset\" title=\"Reset view\"><i class=\"fas fa-compress\"></i></button>");
    out.push_str(&format!(
        "<span class=\"org-zoom-level\">{}%</span>",
        viewport.scale_percent()
    ));
    out.push_str("</div>");

    if !forest.orphans.is_empty() {
        out.push_str("<div class=\"org-warning\"><i class=\"fas fa-exclamation-triangle\"></i><ul>");
        for orphan in &forest.orphans {
            out.push_str(&format!(
                "<li>Department {} references missing parent {} and is shown at the top level.</li>",
                orphan.department_id, orphan.missing_parent_id
            ));
        }
        out.push_str("</ul></div>");
    }

    out.push_str(&format!(
        "<div class=\"org-tree-container\" id=\"{TREE_CONTAINER_ID}\">"
    ));
    out.push_str(&format!(
        "<div class=\"org-tree\" style=\"transform: {}; transform-origin: 0 0\">",
        viewport.transform()
    ));
    out.push_str(&render_forest(forest));
    out.push_str("</div></div></div>");
    out
}

/// Error block shown instead of the tree when the rows cannot be assembled.
pub fn render_hierarchy_error(err: &HierarchyError) -> String {
    format!(
        "<div class=\"org-error\"><i class=\"fas fa-exclamation-circle\"></i><p>The department structure could not be displayed: {}</p></div>",
        escape(&err.to_string())
    )
}

/// Detail panel for the "view" action.
pub fn render_department_details(node: &DepartmentNode) -> String {
    let dept = &node.department;
    let style = type_style(dept.department_type);
    let mut out = String::from("<div class=\"org-details\">");
    out.push_str(&format!(
        "<h3><i class=\"fas {}\" style=\"color: {}\"></i> {}</h3>",
        style.icon,
        style.color,
        escape(&dept.department_name)
    ));
    out.push_str("<dl>");
    let rows = [
        ("Code", escape(&department_code(node))),
        ("Type", dept.department_type.as_str().to_string()),
        (
            "Manager",
            dept.manager_name
                .as_deref()
                .map(escape)
                .unwrap_or_else(|| "-".to_string()),
        ),
        ("Employees", dept.employee_count.to_string()),
        ("Employees incl. sub-units", node.subtree_headcount().to_string()),
        ("Sub-units", node.children.len().to_string()),
        (
            "Description",
            dept.description
                .as_deref()
                .map(escape)
                .unwrap_or_else(|| "-".to_string()),
        ),
    ];
    for (label, value) in rows {
        out.push_str(&format!("<dt>{label}</dt><dd>{value}</dd>"));
    }
    out.push_str("</dl></div>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_forest;
    use crate::models::Department;

    fn dept(id: i64, parent: Option<i64>, name: &str, ty: DepartmentType) -> Department {
        Department {
            department_id: id,
            department_name: name.to_string(),
            department_code: None,
            parent_department_id: parent,
            department_type: ty,
            manager_id: None,
            manager_name: None,
            employee_count: 3,
            description: None,
        }
    }

    fn node_ids(html: &str) -> Vec<i64> {
        html.split("<div class=\"org-node\" data-department-id=\"")
            .skip(1)
            .map(|chunk| chunk.split('"').next().unwrap().parse().unwrap())
            .collect()
    }

    #[test]
    fn test_rendered_nodes_match_records_in_preorder() {
        let records = vec![
            dept(1, None, "Hospital", DepartmentType::Executive),
            dept(2, Some(1), "Nursing", DepartmentType::Clinical),
            dept(3, Some(2), "ICU", DepartmentType::Clinical),
            dept(4, Some(1), "Finance", DepartmentType::Administrative),
            dept(5, Some(77), "Laundry", DepartmentType::Support),
        ];
        let forest = build_forest(&records).unwrap();

        let html = render_forest(&forest);

        let expected: Vec<i64> = forest.flatten().iter().map(|d| d.department_id).collect();
        assert_eq!(node_ids(&html), expected);
        assert_eq!(expected.len(), records.len());
    }

    /// Sum of every `margin-left` on the node's own div and its open ancestors.
    fn effective_indent(html: &str, id: i64) -> Option<usize> {
        fn margin(tag: &str) -> usize {
            tag.split("margin-left: ")
                .nth(1)
                .and_then(|rest| rest.split("px").next())
                .map(|px| px.parse().unwrap())
                .unwrap_or(0)
        }

        let marker = format!("class=\"org-node\" data-department-id=\"{id}\"");
        let mut open: Vec<usize> = Vec::new();
        let mut rest = html;
        loop {
            let next_open = rest.find("<div");
            let next_close = rest.find("</div>");
            match (next_open, next_close) {
                (Some(o), c) if c.map_or(true, |c| o < c) => {
                    let end = o + rest[o..].find('>').unwrap();
                    let tag = &rest[o..end];
                    if tag.contains(&marker) {
                        return Some(open.iter().sum::<usize>() + margin(tag));
                    }
                    open.push(margin(tag));
                    rest = &rest[end + 1..];
                }
                (_, Some(c)) => {
                    open.pop();
                    rest = &rest[c + "</div>".len()..];
                }
                _ => return None,
            }
        }
    }

    #[test]
    fn test_indentation_follows_depth() {
        let records = vec![
            dept(1, None, "A", DepartmentType::Executive),
            dept(2, Some(1), "B", DepartmentType::Clinical),
            dept(3, Some(2), "C", DepartmentType::Clinical),
            dept(4, Some(3), "D", DepartmentType::Clinical),
            dept(5, Some(1), "E", DepartmentType::Support),
        ];
        let html = render_forest(&build_forest(&records).unwrap());

        assert!(html.contains("data-department-id=\"4\" data-level=\"3\""));
        assert_eq!(effective_indent(&html, 1), Some(0));
        assert_eq!(effective_indent(&html, 2), Some(INDENT_PX));
        assert_eq!(effective_indent(&html, 3), Some(2 * INDENT_PX));
        assert_eq!(effective_indent(&html, 4), Some(3 * INDENT_PX));
        // A sibling after a deep branch is back at its own level
        assert_eq!(effective_indent(&html, 5), Some(INDENT_PX));
    }

    #[test]
    fn test_leaf_has_no_children_block() {
        let records = vec![dept(1, None, "Solo", DepartmentType::Support)];
        let html = render_forest(&build_forest(&records).unwrap());

        assert!(!html.contains("org-node-children"));
        assert!(!html.contains("sub-units"));
        assert!(html.contains("data-action=\"view\" data-department-id=\"1\""));
        assert!(html.contains("data-action=\"export\" data-department-id=\"1\""));
    }

    #[test]
    fn test_unknown_type_uses_neutral_style() {
        let records = vec![dept(1, None, "Chapel", DepartmentType::Unknown)];
        let html = render_forest(&build_forest(&records).unwrap());

        assert!(html.contains("fa-building"));
        assert!(html.contains("#6b7280"));
    }

    #[test]
    fn test_optional_fields_and_escaping() {
        let mut record = dept(9, None, "Radiology & <Imaging>", DepartmentType::Ancillary);
        record.manager_name = Some("Dr. O'Neil".to_string());
        record.description = Some("CT, MRI \"and\" X-ray".to_string());
        record.department_code = Some("RAD".to_string());
        let html = render_forest(&build_forest(&[record]).unwrap());

        assert!(html.contains("Radiology &amp; &lt;Imaging&gt;"));
        assert!(html.contains("Manager: Dr. O&#39;Neil"));
        assert!(html.contains("CT, MRI &quot;and&quot; X-ray"));
        assert!(html.contains("<span class=\"org-node-code\">RAD</span>"));
    }

    #[test]
    fn test_code_falls_back_to_padded_id() {
        let forest = build_forest(&[dept(7, None, "Kitchen", DepartmentType::Support)]).unwrap();
        assert_eq!(department_code(&forest.roots[0]), "D007");
    }

    #[test]
    fn test_empty_forest_renders_setup_call_to_action() {
        let html = render_hierarchy(&Forest::default(), &Viewport::default());

        assert!(html.contains("Setup Hospital Structure"));
        assert!(html.contains("data-action=\"setup\""));
        assert!(!html.contains(TREE_CONTAINER_ID));
        assert!(!html.contains("org-node"));
    }

    #[test]
    fn test_hierarchy_view_lists_orphans_and_transform() {
        let records = vec![dept(3, Some(99), "C", DepartmentType::Clinical)];
        let forest = build_forest(&records).unwrap();
        let mut viewport = Viewport::default();
        viewport.zoom_in();

        let html = render_hierarchy(&forest, &viewport);

        assert!(html.contains("missing parent 99"));
        assert!(html.contains("transform: scale(1.1)"));
        assert!(html.contains("110%"));
    }

    #[test]
    fn test_details_panel_sums_subtree() {
        let records = vec![
            dept(1, None, "A", DepartmentType::Executive),
            dept(2, Some(1), "B", DepartmentType::Clinical),
        ];
        let forest = build_forest(&records).unwrap();

        let html = render_department_details(&forest.roots[0]);

        assert!(html.contains("<dt>Employees incl. sub-units</dt><dd>6</dd>"));
        assert!(html.contains("<dt>Manager</dt><dd>-</dd>"));
    }
}

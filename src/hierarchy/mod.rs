//! Department hierarchy assembly.
//!
//! Turns the flat department rows into a forest of nested nodes. Children keep the
//! order in which the rows arrived; no sorting is applied here.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;

use crate::models::{Department, DepartmentMove};

/// Errors that make a set of department rows unusable as a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("department {0} appears more than once")]
    DuplicateDepartment(i64),
    #[error("departments {department_ids:?} form a parent cycle")]
    Cycle { department_ids: Vec<i64> },
    #[error("department {0} does not exist")]
    UnknownDepartment(i64),
    #[error("parent department {0} does not exist")]
    UnknownParent(i64),
    #[error("department {0} cannot be its own parent")]
    SelfParent(i64),
}

/// A department whose parent reference points outside the loaded set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedParent {
    pub department_id: i64,
    pub missing_parent_id: i64,
}

/// A department plus its ordered children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentNode {
    #[serde(flatten)]
    pub department: Department,
    pub children: Vec<DepartmentNode>,
}

impl DepartmentNode {
    pub fn id(&self) -> i64 {
        self.department.department_id
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }

    /// Sum of employee counts over this subtree.
    pub fn subtree_headcount(&self) -> i64 {
        self.department.employee_count
            + self
                .children
                .iter()
                .map(|c| c.subtree_headcount())
                .sum::<i64>()
    }

    fn collect_preorder<'a>(&'a self, out: &mut Vec<&'a Department>) {
        out.push(&self.department);
        for child in &self.children {
            child.collect_preorder(out);
        }
    }

    fn find(&self, id: i64) -> Option<&DepartmentNode> {
        if self.id() == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    fn depth_of(&self, id: i64, depth: usize) -> Option<usize> {
        if self.id() == id {
            return Some(depth);
        }
        self.children.iter().find_map(|c| c.depth_of(id, depth + 1))
    }
}

/// Root nodes plus warnings about dangling parent references.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forest {
    pub roots: Vec<DepartmentNode>,
    pub orphans: Vec<OrphanedParent>,
}

impl Forest {
    /// Total number of nodes across all trees.
    pub fn len(&self) -> usize {
        self.roots.iter().map(|r| r.subtree_len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order listing of every department in the forest.
    pub fn flatten(&self) -> Vec<&Department> {
        let mut out = Vec::with_capacity(self.len());
        for root in &self.roots {
            root.collect_preorder(&mut out);
        }
        out
    }

    pub fn find(&self, id: i64) -> Option<&DepartmentNode> {
        self.roots.iter().find_map(|r| r.find(id))
    }

    /// Nesting level of a department; roots are level 0.
    pub fn depth_of(&self, id: i64) -> Option<usize> {
        self.roots.iter().find_map(|r| r.depth_of(id, 0))
    }
}

/// Build a forest from flat department rows.
///
/// A row is a root when its parent id is absent, `0`, or not present in `records`.
/// The last case is also reported in [`Forest::orphans`]. Rows that cannot be reached
/// from any root are part of a parent cycle and fail the whole build.
pub fn build_forest(records: &[Department]) -> Result<Forest, HierarchyError> {
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        if index.insert(record.department_id, i).is_some() {
            return Err(HierarchyError::DuplicateDepartment(record.department_id));
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut root_indices = Vec::new();
    let mut orphans = Vec::new();

    for (i, record) in records.iter().enumerate() {
        match record.parent_ref() {
            Some(parent_id) => match index.get(&parent_id) {
                Some(&parent) => children[parent].push(i),
                None => {
                    orphans.push(OrphanedParent {
                        department_id: record.department_id,
                        missing_parent_id: parent_id,
                    });
                    root_indices.push(i);
                }
            },
            None => root_indices.push(i),
        }
    }

    let mut visited = vec![false; records.len()];
    let roots: Vec<DepartmentNode> = root_indices
        .iter()
        .map(|&i| assemble(i, records, &children, &mut visited))
        .collect();

    let unreachable: Vec<i64> = records
        .iter()
        .zip(&visited)
        .filter(|(_, seen)| !**seen)
        .map(|(record, _)| record.department_id)
        .collect();
    if !unreachable.is_empty() {
        return Err(HierarchyError::Cycle {
            department_ids: unreachable,
        });
    }

    if !orphans.is_empty() {
        tracing::warn!(
            count = orphans.len(),
            "departments reference parents outside the loaded set"
        );
    }

    Ok(Forest { roots, orphans })
}

fn assemble(
    i: usize,
    records: &[Department],
    children: &[Vec<usize>],
    visited: &mut [bool],
) -> DepartmentNode {
    visited[i] = true;
    DepartmentNode {
        department: records[i].clone(),
        children: children[i]
            .iter()
            .map(|&c| assemble(c, records, children, visited))
            .collect(),
    }
}

/// Apply a batch of reparent moves to flat rows and rebuild the forest.
///
/// Every move is checked against the original set of ids; the resulting rows must
/// still form an acyclic forest. On success the updated rows are returned alongside
/// the forest so callers can persist exactly what was validated.
pub fn apply_moves(
    records: &[Department],
    moves: &[DepartmentMove],
) -> Result<(Vec<Department>, Forest), HierarchyError> {
    let ids: HashSet<i64> = records.iter().map(|r| r.department_id).collect();
    let mut updated = records.to_vec();

    for mv in moves {
        if !ids.contains(&mv.department_id) {
            return Err(HierarchyError::UnknownDepartment(mv.department_id));
        }
        let new_parent = mv.new_parent_id.filter(|id| *id != 0);
        if let Some(parent) = new_parent {
            if parent == mv.department_id {
                return Err(HierarchyError::SelfParent(parent));
            }
            if !ids.contains(&parent) {
                return Err(HierarchyError::UnknownParent(parent));
            }
        }
        if let Some(record) = updated
            .iter_mut()
            .find(|r| r.department_id == mv.department_id)
        {
            record.parent_department_id = new_parent;
        }
    }

    let forest = build_forest(&updated)?;
    Ok((updated, forest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DepartmentType;

    fn dept(id: i64, parent: Option<i64>, name: &str) -> Department {
        Department {
            department_id: id,
            department_name: name.to_string(),
            department_code: None,
            parent_department_id: parent,
            department_type: DepartmentType::Clinical,
            manager_id: None,
            manager_name: None,
            employee_count: 1,
            description: None,
        }
    }

    fn names(nodes: &[DepartmentNode]) -> Vec<&str> {
        nodes
            .iter()
            .map(|n| n.department.department_name.as_str())
            .collect()
    }

    #[test]
    fn test_dangling_parent_becomes_root() {
        let records = vec![
            dept(1, None, "A"),
            dept(2, Some(1), "B"),
            dept(3, Some(99), "C"),
        ];

        let forest = build_forest(&records).unwrap();

        assert_eq!(names(&forest.roots), vec!["A", "C"]);
        assert_eq!(names(&forest.roots[0].children), vec!["B"]);
        assert_eq!(
            forest.orphans,
            vec![OrphanedParent {
                department_id: 3,
                missing_parent_id: 99
            }]
        );
    }

    #[test]
    fn test_zero_and_missing_parent_are_roots_without_warnings() {
        let records = vec![dept(1, Some(0), "A"), dept(2, None, "B")];

        let forest = build_forest(&records).unwrap();

        assert_eq!(names(&forest.roots), vec!["A", "B"]);
        assert!(forest.orphans.is_empty());
    }

    #[test]
    fn test_children_keep_input_order() {
        let records = vec![
            dept(5, Some(1), "Zeta"),
            dept(1, None, "Root"),
            dept(3, Some(1), "Alpha"),
            dept(4, Some(1), "Mid"),
        ];

        let forest = build_forest(&records).unwrap();

        assert_eq!(forest.roots.len(), 1);
        assert_eq!(
            names(&forest.roots[0].children),
            vec!["Zeta", "Alpha", "Mid"]
        );
    }

    #[test]
    fn test_node_count_and_flatten_preserve_records() {
        let records = vec![
            dept(1, None, "Hospital"),
            dept(2, Some(1), "Medical"),
            dept(3, Some(2), "Surgery"),
            dept(4, Some(2), "Pediatrics"),
            dept(5, Some(1), "Finance"),
            dept(6, Some(5), "Payroll"),
            dept(7, None, "Foundation"),
        ];

        let forest = build_forest(&records).unwrap();

        assert_eq!(forest.len(), records.len());
        assert_eq!(forest.depth_of(7), Some(0));
        assert_eq!(forest.depth_of(6), Some(2));
        assert_eq!(forest.depth_of(99), None);
        let mut flat: Vec<i64> = forest.flatten().iter().map(|d| d.department_id).collect();
        assert_eq!(flat, vec![1, 2, 3, 4, 5, 6, 7]);
        flat.sort();
        flat.dedup();
        assert_eq!(flat.len(), records.len());

        for record in &records {
            if let Some(parent) = record.parent_ref() {
                let parent_node = forest.find(parent).unwrap();
                let hits = parent_node
                    .children
                    .iter()
                    .filter(|c| c.id() == record.department_id)
                    .count();
                assert_eq!(hits, 1);
            }
        }
    }

    #[test]
    fn test_cycle_is_reported() {
        let records = vec![
            dept(1, None, "Root"),
            dept(2, Some(3), "A"),
            dept(3, Some(2), "B"),
            dept(4, Some(3), "Below cycle"),
        ];

        let err = build_forest(&records).unwrap_err();

        assert_eq!(
            err,
            HierarchyError::Cycle {
                department_ids: vec![2, 3, 4]
            }
        );
    }

    #[test]
    fn test_self_parent_row_is_a_cycle() {
        let records = vec![dept(8, Some(8), "Loop")];

        assert_eq!(
            build_forest(&records).unwrap_err(),
            HierarchyError::Cycle {
                department_ids: vec![8]
            }
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let records = vec![dept(1, None, "A"), dept(1, None, "A again")];

        assert_eq!(
            build_forest(&records).unwrap_err(),
            HierarchyError::DuplicateDepartment(1)
        );
    }

    #[test]
    fn test_empty_input_is_empty_forest() {
        let forest = build_forest(&[]).unwrap();
        assert!(forest.is_empty());
        assert_eq!(forest.len(), 0);
    }

    #[test]
    fn test_subtree_headcount() {
        let mut records = vec![dept(1, None, "A"), dept(2, Some(1), "B"), dept(3, Some(2), "C")];
        records[2].employee_count = 10;

        let forest = build_forest(&records).unwrap();

        assert_eq!(forest.roots[0].subtree_headcount(), 12);
        assert_eq!(forest.find(2).unwrap().subtree_len(), 2);
    }

    #[test]
    fn test_apply_moves_reparents() {
        let records = vec![dept(1, None, "A"), dept(2, None, "B"), dept(3, Some(1), "C")];
        let moves = [DepartmentMove {
            department_id: 3,
            new_parent_id: Some(2),
        }];

        let (updated, forest) = apply_moves(&records, &moves).unwrap();

        assert_eq!(updated[2].parent_department_id, Some(2));
        assert!(forest.find(1).unwrap().children.is_empty());
        assert_eq!(forest.find(2).unwrap().children[0].id(), 3);
    }

    #[test]
    fn test_apply_moves_rejects_cycle_and_bad_ids() {
        let records = vec![dept(1, None, "A"), dept(2, Some(1), "B")];

        let cycle = [DepartmentMove {
            department_id: 1,
            new_parent_id: Some(2),
        }];
        assert!(matches!(
            apply_moves(&records, &cycle),
            Err(HierarchyError::Cycle { .. })
        ));

        let self_parent = [DepartmentMove {
            department_id: 2,
            new_parent_id: Some(2),
        }];
        assert_eq!(
            apply_moves(&records, &self_parent).unwrap_err(),
            HierarchyError::SelfParent(2)
        );

        let unknown = [DepartmentMove {
            department_id: 2,
            new_parent_id: Some(42),
        }];
        assert_eq!(
            apply_moves(&records, &unknown).unwrap_err(),
            HierarchyError::UnknownParent(42)
        );
    }

    #[test]
    fn test_apply_moves_to_top_level() {
        let records = vec![dept(1, None, "A"), dept(2, Some(1), "B")];
        let moves = [DepartmentMove {
            department_id: 2,
            new_parent_id: None,
        }];

        let (_, forest) = apply_moves(&records, &moves).unwrap();

        assert_eq!(forest.roots.len(), 2);
    }
}

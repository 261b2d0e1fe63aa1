//! Drag-and-drop reparent round trip.
//!
//! The flow never patches the tree locally: a successful move reloads every department
//! and rebuilds the forest from scratch. A failed request leaves the caller's tree as is.

use crate::client::OrgClient;
use crate::hierarchy::{build_forest, Forest, HierarchyError};
use crate::models::DepartmentMove;

#[derive(Debug)]
pub enum ReparentOutcome {
    /// The user declined the confirmation prompt; nothing was sent.
    Cancelled,
    /// The backend refused or could not be reached.
    Failed(String),
    /// Move committed and the structure reloaded.
    Reloaded(Forest),
    /// Move committed but the reloaded rows do not form a tree.
    Invalid(HierarchyError),
}

/// Confirmation text shown before a move is sent.
pub fn confirm_prompt(mv: &DepartmentMove) -> String {
    match mv.new_parent_id {
        Some(parent) => format!(
            "Move department {} under department {}?",
            mv.department_id, parent
        ),
        None => format!("Move department {} to the top level?", mv.department_id),
    }
}

/// Confirm, send the move, then reload and rebuild on success.
pub async fn run_reparent<F>(client: &OrgClient, mv: DepartmentMove, confirm: F) -> ReparentOutcome
where
    F: FnOnce(&str) -> bool,
{
    if !confirm(&confirm_prompt(&mv)) {
        return ReparentOutcome::Cancelled;
    }

    if let Err(e) = client.reorder(&[mv]).await {
        tracing::warn!(
            department_id = mv.department_id,
            new_parent_id = ?mv.new_parent_id,
            error = %e,
            "Reparent request failed"
        );
        return ReparentOutcome::Failed(e.to_string());
    }

    let structure = client.load_structure().await;
    match build_forest(&structure.departments) {
        Ok(forest) => ReparentOutcome::Reloaded(forest),
        Err(e) => ReparentOutcome::Invalid(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_text() {
        let mv = DepartmentMove {
            department_id: 5,
            new_parent_id: Some(2),
        };
        assert_eq!(confirm_prompt(&mv), "Move department 5 under department 2?");
    }

    #[tokio::test]
    async fn test_declined_confirmation_sends_nothing() {
        let client = OrgClient::new("http://127.0.0.1:9/api");
        let mv = DepartmentMove {
            department_id: 5,
            new_parent_id: Some(2),
        };

        let outcome = run_reparent(&client, mv, |_| false).await;

        assert!(matches!(outcome, ReparentOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_unreachable_backend_reports_failure() {
        let client = OrgClient::new("http://127.0.0.1:9/api");
        let mv = DepartmentMove {
            department_id: 5,
            new_parent_id: Some(2),
        };

        let outcome = run_reparent(&client, mv, |_| true).await;

        assert!(matches!(outcome, ReparentOutcome::Failed(_)));
    }
}

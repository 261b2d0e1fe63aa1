//! HMO benefits records.
//!
//! Enrollment and claim statuses are free-form strings owned by the backend; nothing
//! here enforces legal transitions between them.

use serde::{Deserialize, Serialize};

/// A health plan employees can enroll in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HmoPlan {
    pub id: i64,
    pub name: String,
    pub provider: String,
    pub monthly_premium: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HmoEnrollment {
    pub id: i64,
    pub employee_id: i64,
    pub plan_id: i64,
    pub status: String,
    pub monthly_contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HmoClaim {
    pub id: i64,
    /// External reference quoted to the provider.
    pub claim_number: String,
    pub enrollment_id: i64,
    pub amount: f64,
    pub status: String,
    pub submitted_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
}

/// Claim statuses the dashboard groups by. Anything else is counted under its raw string.
pub const CLAIM_STATUSES: [&str; 5] = ["Submitted", "Under Review", "Approved", "Rejected", "Paid"];

/// Count and amount for one status bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusBucket {
    pub status: String,
    pub count: i64,
    pub amount: f64,
}

/// Dashboard aggregate for the HMO module.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HmoSummary {
    pub enrollments: Vec<StatusBucket>,
    pub claims: Vec<StatusBucket>,
    pub total_monthly_contribution: f64,
    pub pending_claims: i64,
}

impl HmoSummary {
    /// Aggregate raw records into status buckets.
    ///
    /// Known claim statuses always appear (with zero counts) in their canonical order;
    /// unrecognised statuses follow in first-seen order.
    pub fn aggregate(enrollments: &[HmoEnrollment], claims: &[HmoClaim]) -> Self {
        let mut enrollment_buckets: Vec<StatusBucket> = Vec::new();
        for enrollment in enrollments {
            let bucket = bucket_for(&mut enrollment_buckets, &enrollment.status);
            bucket.count += 1;
            bucket.amount += enrollment.monthly_contribution;
        }

        let mut claim_buckets: Vec<StatusBucket> = CLAIM_STATUSES
            .iter()
            .map(|s| StatusBucket {
                status: s.to_string(),
                ..Default::default()
            })
            .collect();
        for claim in claims {
            let bucket = bucket_for(&mut claim_buckets, &claim.status);
            bucket.count += 1;
            bucket.amount += claim.amount;
        }

        let total_monthly_contribution = enrollments
            .iter()
            .filter(|e| e.status.eq_ignore_ascii_case("active"))
            .map(|e| e.monthly_contribution)
            .sum();

        let pending_claims = claims
            .iter()
            .filter(|c| c.status == "Submitted" || c.status == "Under Review")
            .count() as i64;

        Self {
            enrollments: enrollment_buckets,
            claims: claim_buckets,
            total_monthly_contribution,
            pending_claims,
        }
    }
}

fn bucket_for<'a>(buckets: &'a mut Vec<StatusBucket>, status: &str) -> &'a mut StatusBucket {
    let index = match buckets.iter().position(|b| b.status == status) {
        Some(index) => index,
        None => {
            buckets.push(StatusBucket {
                status: status.to_string(),
                ..Default::default()
            });
            buckets.len() - 1
        }
    };
    &mut buckets[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(id: i64, status: &str, amount: f64) -> HmoClaim {
        HmoClaim {
            id,
            claim_number: format!("CLM-{id}"),
            enrollment_id: 1,
            amount,
            status: status.to_string(),
            submitted_at: "2025-01-01T00:00:00Z".to_string(),
            approved_at: None,
        }
    }

    #[test]
    fn test_summary_buckets_known_and_unknown_statuses() {
        let enrollments = vec![
            HmoEnrollment {
                id: 1,
                employee_id: 10,
                plan_id: 1,
                status: "Active".to_string(),
                monthly_contribution: 1500.0,
            },
            HmoEnrollment {
                id: 2,
                employee_id: 11,
                plan_id: 1,
                status: "Inactive".to_string(),
                monthly_contribution: 900.0,
            },
        ];
        let claims = vec![
            claim(1, "Submitted", 1000.0),
            claim(2, "Paid", 2500.0),
            claim(3, "Submitted", 500.0),
            claim(4, "On Hold", 75.0),
        ];

        let summary = HmoSummary::aggregate(&enrollments, &claims);

        assert_eq!(summary.claims.len(), 6);
        assert_eq!(summary.claims[0].status, "Submitted");
        assert_eq!(summary.claims[0].count, 2);
        assert_eq!(summary.claims[0].amount, 1500.0);
        assert_eq!(summary.claims[2].count, 0);
        assert_eq!(summary.claims[5].status, "On Hold");
        assert_eq!(summary.pending_claims, 2);
        assert_eq!(summary.enrollments.len(), 2);
        assert_eq!(summary.total_monthly_contribution, 1500.0);
    }
}

//! Fleet health view - aggregation of per-machine status into the
//! five-band fleet summary.
//!
//! Matches the `GET /health/fleet` contract of the health service:
//! machines sorted worst-health first, band counts that always sum to the
//! machine total, and an average health figure for the header widget.

use serde::{Deserialize, Serialize};

use crate::classifier::ThresholdClassifier;
use crate::types::{FleetSummary, HealthStatus, MachineStatus};

/// Wire shape of the fleet health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetHealth {
    pub summary: FleetSummary,
    pub machines: Vec<MachineStatus>,
}

impl FleetHealth {
    /// Aggregate machine statuses into the fleet view.
    ///
    /// Sorts worst-health first and tallies the five bands; the counts sum
    /// to `total_machines` by construction (every machine lands in exactly
    /// one band).
    pub fn aggregate(mut machines: Vec<MachineStatus>) -> Self {
        machines.sort_by(|a, b| {
            a.health_score
                .partial_cmp(&b.health_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut summary = FleetSummary {
            total_machines: machines.len(),
            ..FleetSummary::default()
        };

        for machine in &machines {
            match machine.status {
                HealthStatus::Optimal => summary.optimal += 1,
                HealthStatus::Good => summary.good += 1,
                HealthStatus::Moderate => summary.moderate += 1,
                HealthStatus::Degraded => summary.degraded += 1,
                HealthStatus::Critical => summary.critical += 1,
            }
        }

        if !machines.is_empty() {
            let total: f64 = machines.iter().map(|m| m.health_score).sum();
            summary.average_health = (total / machines.len() as f64 * 10.0).round() / 10.0;
        }

        Self { summary, machines }
    }

    /// Build the fleet view from raw (machine_id, health_score) pairs,
    /// deriving each status band through the classifier.
    pub fn from_scores(
        classifier: &ThresholdClassifier,
        scores: impl IntoIterator<Item = (String, f64)>,
    ) -> Self {
        let machines = scores
            .into_iter()
            .enumerate()
            .map(|(i, (machine_id, score))| {
                MachineStatus::new(machine_id, score, format!("Bay {}", i + 1), |h| {
                    classifier.classify_health(h)
                })
            })
            .collect();
        Self::aggregate(machines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ThresholdClassifier {
        ThresholdClassifier::default()
    }

    #[test]
    fn test_band_counts_sum_to_total() {
        let scores = vec![
            ("CNC-ALPHA-921".to_string(), 95.0),
            ("CNC-ALPHA-922".to_string(), 85.0),
            ("CNC-BETA-101".to_string(), 60.0),
            ("CNC-BETA-102".to_string(), 40.0),
            ("MILL-GAMMA-301".to_string(), 12.0),
            ("MILL-GAMMA-302".to_string(), 70.0),
            ("LATHE-DELTA-401".to_string(), 25.0),
            ("LATHE-DELTA-402".to_string(), 90.0),
        ];
        let fleet = FleetHealth::from_scores(&classifier(), scores);

        assert_eq!(fleet.summary.total_machines, 8);
        assert_eq!(fleet.summary.band_total(), 8);
        // Boundary scores: 70.0 -> Moderate, 25.0 -> Critical, 90.0 -> Good
        assert_eq!(fleet.summary.optimal, 1);
        assert_eq!(fleet.summary.good, 2);
        assert_eq!(fleet.summary.moderate, 2);
        assert_eq!(fleet.summary.degraded, 1);
        assert_eq!(fleet.summary.critical, 2);
    }

    #[test]
    fn test_machines_sorted_worst_first() {
        let fleet = FleetHealth::from_scores(
            &classifier(),
            vec![
                ("A".to_string(), 80.0),
                ("B".to_string(), 20.0),
                ("C".to_string(), 55.0),
            ],
        );
        let ids: Vec<_> = fleet
            .machines
            .iter()
            .map(|m| m.machine_id.as_str())
            .collect();
        assert_eq!(ids, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_low_health_machines_carry_last_alert() {
        let fleet = FleetHealth::from_scores(
            &classifier(),
            vec![("A".to_string(), 95.0), ("B".to_string(), 65.0)],
        );
        let by_id = |id: &str| fleet.machines.iter().find(|m| m.machine_id == id).unwrap();
        assert!(by_id("A").last_alert.is_none());
        assert!(by_id("B").last_alert.is_some());
    }

    #[test]
    fn test_empty_fleet_is_well_formed() {
        let fleet = FleetHealth::aggregate(Vec::new());
        assert_eq!(fleet.summary.total_machines, 0);
        assert_eq!(fleet.summary.band_total(), 0);
        assert_eq!(fleet.summary.average_health, 0.0);
    }

    #[test]
    fn test_average_health_rounded_to_one_decimal() {
        let fleet = FleetHealth::from_scores(
            &classifier(),
            vec![("A".to_string(), 80.0), ("B".to_string(), 75.05)],
        );
        assert_eq!(fleet.summary.average_health, 77.5);
    }
}

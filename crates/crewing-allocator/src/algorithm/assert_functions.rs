use anyhow::Result;
use anyhow::bail;
use anyhow::ensure;
use tracing::Level;
use tracing::event;

use super::allocation_model::AllocationModel;
use super::solver_driver::FEASIBILITY_TOLERANCE;
use crate::allocation::ASSIGNMENT_THRESHOLD;

pub trait AllocationAssertions {
    fn assert_that_solution_has_one_value_per_variable(&self, values: &[f64]) -> Result<()>;
    fn assert_that_constraints_are_respected(&self, values: &[f64]) -> Result<()>;
}

impl AllocationAssertions for AllocationModel {
    fn assert_that_solution_has_one_value_per_variable(&self, values: &[f64]) -> Result<()> {
        ensure!(
            values.len() == self.assignments().len(),
            "solver returned {} values for {} assignment variables",
            values.len(),
            self.assignments().len()
        );
        Ok(())
    }

    /// Checks the thresholded assignment, which is what gets reported, not the
    /// raw solver values.
    fn assert_that_constraints_are_respected(&self, values: &[f64]) -> Result<()> {
        self.assert_that_solution_has_one_value_per_variable(values)?;

        let assigned: Vec<f64> = values
            .iter()
            .map(|value| if *value > ASSIGNMENT_THRESHOLD { 1.0 } else { 0.0 })
            .collect();

        let mut violations = 0;
        for linear_constraint in self.constraints() {
            let activity = linear_constraint.evaluate(&assigned);
            if !linear_constraint.is_satisfied_by(activity, FEASIBILITY_TOLERANCE) {
                event!(
                    Level::ERROR,
                    constraint = %linear_constraint.label,
                    family = %linear_constraint.family,
                    activity,
                    lower = ?linear_constraint.lower,
                    upper = ?linear_constraint.upper,
                    "allocation_constraint_violated"
                );
                violations += 1;
            }
        }

        if violations != 0 {
            bail!("{violations} constraints violated by the extracted allocation")
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crewing_configuration::requirement_catalog::VehicleRequirements;
    use crewing_scheduling_environment::mission::Mission;
    use crewing_scheduling_environment::mission::MissionId;
    use crewing_scheduling_environment::time_environment::TimeWindow;
    use crewing_scheduling_environment::vehicle::Vehicle;
    use crewing_scheduling_environment::vehicle::VehicleId;
    use crewing_scheduling_environment::worker_environment::Worker;
    use crewing_scheduling_environment::worker_environment::WorkerId;

    use super::*;
    use crate::algorithm::candidate_filter::CandidateMission;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[test]
    fn test_overlapping_assignment_is_rejected() -> anyhow::Result<()> {
        let workers = vec![Worker::new(WorkerId::from("101"), "Employee 1", "Captain")];
        let missions = [
            Mission::new(MissionId::from("301"), VehicleId::from("201"), "A to B", date(1), date(4)),
            Mission::new(MissionId::from("302"), VehicleId::from("201"), "B to C", date(4), date(8)),
        ];
        let vehicle = Vehicle::new(VehicleId::from("201"), "Vessel 1", "Pilot Boat");
        let requirements = VehicleRequirements::new(1, Vec::<(String, f64)>::new());
        let candidates: Vec<CandidateMission> = missions
            .iter()
            .map(|mission| CandidateMission {
                mission,
                vehicle: &vehicle,
                requirements: Some(&requirements),
            })
            .collect();
        let allocation_model =
            AllocationModel::build(&workers, &candidates, &TimeWindow::new(date(1), date(8)))?;

        assert!(
            allocation_model
                .assert_that_constraints_are_respected(&[1.0, 1.0])
                .is_err()
        );
        // Crew size on the second mission is not met.
        assert!(
            allocation_model
                .assert_that_constraints_are_respected(&[0.99, 0.2])
                .is_err()
        );
        assert!(
            allocation_model
                .assert_that_solution_has_one_value_per_variable(&[1.0])
                .is_err()
        );
        Ok(())
    }

    #[test]
    fn test_feasible_assignment_passes() -> anyhow::Result<()> {
        let workers = vec![
            Worker::new(WorkerId::from("101"), "Employee 1", "Captain"),
            Worker::new(WorkerId::from("102"), "Employee 2", "Deckhand"),
        ];
        let missions = [
            Mission::new(MissionId::from("301"), VehicleId::from("201"), "A to B", date(1), date(4)),
            Mission::new(MissionId::from("302"), VehicleId::from("201"), "B to C", date(4), date(8)),
        ];
        let vehicle = Vehicle::new(VehicleId::from("201"), "Vessel 1", "Pilot Boat");
        let requirements = VehicleRequirements::new(1, Vec::<(String, f64)>::new());
        let candidates: Vec<CandidateMission> = missions
            .iter()
            .map(|mission| CandidateMission {
                mission,
                vehicle: &vehicle,
                requirements: Some(&requirements),
            })
            .collect();
        let allocation_model =
            AllocationModel::build(&workers, &candidates, &TimeWindow::new(date(1), date(8)))?;

        allocation_model.assert_that_constraints_are_respected(&[1.0, 0.0, 0.0, 1.0])?;
        Ok(())
    }
}

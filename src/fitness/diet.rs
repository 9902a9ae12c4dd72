use std::fmt;

use serde::Serialize;

/// Calories above which the high-protein plan is suggested (exclusive).
pub const HIGH_PROTEIN_ABOVE_KCAL: f64 = 300.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum DietPlan {
    HighProtein,
    Balanced,
}

impl DietPlan {
    /// Total over every `f64`; NaN falls through to `Balanced`.
    pub fn for_calories(calories: f64) -> Self {
        if calories > HIGH_PROTEIN_ABOVE_KCAL {
            DietPlan::HighProtein
        } else {
            DietPlan::Balanced
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DietPlan::HighProtein => "High Protein",
            DietPlan::Balanced => "Balanced",
        }
    }

    pub fn garnish(self) -> &'static str {
        match self {
            DietPlan::HighProtein => "🍗🥗",
            DietPlan::Balanced => "🥗🍎",
        }
    }
}

impl fmt::Display for DietPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::metrics::StepResult;

    #[test]
    fn boundary_is_strictly_above_300() {
        assert_eq!(DietPlan::for_calories(300.0), DietPlan::Balanced);
        assert_eq!(DietPlan::for_calories(300.01), DietPlan::HighProtein);
        assert_eq!(DietPlan::for_calories(0.0), DietPlan::Balanced);
        assert_eq!(DietPlan::for_calories(-5.0), DietPlan::Balanced);
    }

    #[test]
    fn non_finite_inputs_still_get_a_plan() {
        assert_eq!(DietPlan::for_calories(f64::NAN), DietPlan::Balanced);
        assert_eq!(DietPlan::for_calories(f64::INFINITY), DietPlan::HighProtein);
    }

    #[test]
    fn plans_follow_step_results() {
        let gold = StepResult::from_steps(10_000);
        assert_eq!(DietPlan::for_calories(gold.calories).label(), "High Protein");
        let bronze = StepResult::from_steps(5_000);
        assert_eq!(DietPlan::for_calories(bronze.calories).label(), "Balanced");
        // 7500 steps burn exactly 300 kcal.
        assert_eq!(
            DietPlan::for_calories(StepResult::from_steps(7_500).calories),
            DietPlan::Balanced
        );
    }
}

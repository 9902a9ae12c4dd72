use std::fmt;

use serde::{Deserialize, Serialize};

/// Energy burned per step, in kcal.
pub const KCAL_PER_STEP: f64 = 0.04;
/// Energy content of one kilogram of body fat, in kcal.
pub const KCAL_PER_KG: f64 = 7700.0;

pub const SILVER_STEPS: u32 = 7_000;
pub const GOLD_STEPS: u32 = 10_000;

/// Achievement tier for a day's step count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Badge {
    Bronze,
    Silver,
    Gold,
}

impl Badge {
    /// Highest tier whose threshold `steps` reaches.
    pub fn for_steps(steps: u32) -> Self {
        if steps >= GOLD_STEPS {
            Badge::Gold
        } else if steps >= SILVER_STEPS {
            Badge::Silver
        } else {
            Badge::Bronze
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Badge::Bronze => "Bronze",
            Badge::Silver => "Silver",
            Badge::Gold => "Gold",
        }
    }

    pub fn medal(self) -> &'static str {
        match self {
            Badge::Bronze => "🥉",
            Badge::Silver => "🥈",
            Badge::Gold => "🏅",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metrics derived from one step submission. Lives only inside a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub steps: u32,
    pub calories: f64,
    pub weight_lost: f64,
    pub badge: Badge,
}

impl StepResult {
    pub fn from_steps(steps: u32) -> Self {
        let calories = round_to(f64::from(steps) * KCAL_PER_STEP, 2);
        let weight_lost = round_to(calories / KCAL_PER_KG, 4);
        Self {
            steps,
            calories,
            weight_lost,
            badge: Badge::for_steps(steps),
        }
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dense low range, then a sparse walk up to `u32::MAX`.
    fn sampled_steps() -> impl Iterator<Item = u32> {
        (0..=2_000_000u32).chain((2_000_001..=u32::MAX).step_by(9_973))
    }

    // Exact decimal references in integer arithmetic:
    // calories = 4s / 100 kcal, and weight_lost * 10^4 = 4s / 77 rounded half up,
    // which is floor((8s + 77) / 154). 8s is even and 77 odd, so there are no ties.
    fn calories_ref(steps: u32) -> f64 {
        (4 * u64::from(steps)) as f64 / 100.0
    }

    fn weight_lost_ref(steps: u32) -> f64 {
        ((8 * u64::from(steps) + 77) / 154) as f64 / 10_000.0
    }

    #[test]
    fn calories_are_steps_times_rate_rounded_to_cents() {
        for steps in sampled_steps() {
            let r = StepResult::from_steps(steps);
            assert_eq!(r.calories, calories_ref(steps), "steps={steps}");
        }
    }

    #[test]
    fn weight_lost_derives_from_rounded_calories() {
        for steps in sampled_steps() {
            let r = StepResult::from_steps(steps);
            assert_eq!(r.weight_lost, weight_lost_ref(steps), "steps={steps}");
        }
    }

    #[test]
    fn round_to_rounds_half_away_from_zero() {
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(0.05194805, 4), 0.0519);
    }

    #[test]
    fn badge_thresholds_are_inclusive() {
        assert_eq!(StepResult::from_steps(6_999).badge, Badge::Bronze);
        assert_eq!(StepResult::from_steps(7_000).badge, Badge::Silver);
        assert_eq!(StepResult::from_steps(9_999).badge, Badge::Silver);
        assert_eq!(StepResult::from_steps(10_000).badge, Badge::Gold);
        assert_eq!(StepResult::from_steps(u32::MAX).badge, Badge::Gold);
    }

    #[test]
    fn zero_steps_is_bronze_with_nothing_burned() {
        let r = StepResult::from_steps(0);
        assert_eq!(r.calories, 0.0);
        assert_eq!(r.weight_lost, 0.0);
        assert_eq!(r.badge, Badge::Bronze);
    }

    #[test]
    fn ten_thousand_steps() {
        let r = StepResult::from_steps(10_000);
        assert_eq!(r.calories, 400.0);
        assert_eq!(r.weight_lost, 0.0519);
        assert_eq!(r.badge, Badge::Gold);
    }

    #[test]
    fn five_thousand_steps() {
        let r = StepResult::from_steps(5_000);
        assert_eq!(r.calories, 200.0);
        assert_eq!(r.weight_lost, 0.026);
        assert_eq!(r.badge, Badge::Bronze);
    }

    #[test]
    fn badge_serializes_as_its_label() {
        let json = serde_json::to_string(&StepResult::from_steps(7_500)).unwrap();
        assert!(json.contains("\"badge\":\"Silver\""));
        assert_eq!(Badge::Gold.to_string(), "Gold");
    }
}

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StepsForm {
    pub steps: String,
}

impl StepsForm {
    /// Whole, non-negative step count; anything else is rejected before the engine sees it.
    pub fn parse(&self) -> Result<u32, String> {
        self.steps
            .trim()
            .parse::<u32>()
            .map_err(|_| "Steps must be a non-negative whole number".to_string())
    }
}

use super::{ComparisonResult, MatchRecord};

impl ComparisonResult {
    /// Baseline titles found anywhere in the quantized list.
    pub fn matches_found(&self) -> usize {
        self.green_matches.len() + self.yellow_matches.len()
    }

    pub fn baseline_total(&self) -> usize {
        self.matches_found() + self.red_missing.len()
    }

    pub fn quantized_total(&self) -> usize {
        self.matches_found() + self.red_extra.len()
    }

    /// `None` when the baseline was empty.
    pub fn recall(&self) -> Option<f64> {
        let total = self.baseline_total();
        if total == 0 {
            return None;
        }
        Some(self.matches_found() as f64 / total as f64)
    }

    pub fn recall_ratio(&self) -> String {
        format!("{}/{}", self.matches_found(), self.baseline_total())
    }

    /// Largest absolute rank shift among yellow matches.
    pub fn max_position_shift(&self) -> u64 {
        self.yellow_matches
            .iter()
            .map(|record| record.position_delta().unsigned_abs())
            .max()
            .unwrap_or(0)
    }
}

impl MatchRecord {
    /// Positive when the quantized run ranks the title lower than the baseline.
    pub fn position_delta(&self) -> i64 {
        self.quantized_position as i64 - self.full_fidelity_position as i64
    }
}

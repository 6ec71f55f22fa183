use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::JudgingError;

/// One judge's category values for one team: category id -> value.
/// Partial sheets are valid; completeness is evaluated at read time.
pub type ScoreSheet = BTreeMap<String, u32>;

/// Category id of the technical-execution dimension (drives the
/// "Top Technical" award).
pub const TECHNICAL: &str = "technical";
/// Category id of the creativity dimension (drives "Top Creative").
pub const CREATIVITY: &str = "creativity";
pub const THEME: &str = "theme";
pub const PRESENTATION: &str = "presentation";

/// A descriptive level within a category.
///
/// `min..=max` is an inclusive value range; the bands of a category
/// partition `[0, category.max]` exactly.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LevelBand {
    pub min: u32,
    pub max: u32,
    pub label: String,
    pub desc: String,
}

impl LevelBand {
    pub fn contains(&self, value: u32) -> bool {
        self.min <= value && value <= self.max
    }
}

/// One scored dimension of the rubric.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Category {
    /// Unique id used as the key in score sheets (e.g. "technical")
    pub id: String,

    /// Display label (e.g. "Technical Execution")
    pub label: String,

    /// Highest awardable value; valid scores are integers in [0, max]
    pub max: u32,

    /// Descriptive bands partitioning [0, max]
    pub levels: Vec<LevelBand>,
}

/// Ordered sequence of categories, fixed for the event.
///
/// Not user-editable at runtime; `total_max()` is derived from the
/// category maxima and never drifts.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Rubric {
    pub categories: Vec<Category>,
}

impl Default for Rubric {
    fn default() -> Self {
        Self::standard()
    }
}

impl Rubric {
    /// Maximum achievable total: sum of category maxima (25 for the
    /// standard rubric).
    pub fn total_max(&self) -> u32 {
        self.categories.iter().map(|c| c.max).sum()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Look up the level band containing `value` for a category.
    ///
    /// Fails with a `Config` error when the category is unknown or no
    /// band matches. Unreachable on a validated rubric; a failure here
    /// signals a corrupt rubric definition, not bad input.
    pub fn level_for(&self, category_id: &str, value: u32) -> Result<&LevelBand, JudgingError> {
        let category = self.category(category_id).ok_or_else(|| {
            JudgingError::Config(format!("no category with id '{}'", category_id))
        })?;
        category
            .levels
            .iter()
            .find(|band| band.contains(value))
            .ok_or_else(|| {
                JudgingError::Config(format!(
                    "no level band in '{}' contains value {}",
                    category_id, value
                ))
            })
    }

    /// Partial-progress sum of a sheet, treating a missing category as 0.
    ///
    /// Display-only: final totals require a complete sheet (see the
    /// aggregation engine).
    pub fn total_for(&self, sheet: &ScoreSheet) -> u32 {
        self.categories
            .iter()
            .map(|c| sheet.get(&c.id).copied().unwrap_or(0))
            .sum()
    }

    /// A sheet is complete when every category has a value.
    pub fn is_complete(&self, sheet: &ScoreSheet) -> bool {
        self.categories.iter().all(|c| sheet.contains_key(&c.id))
    }

    /// The standard four-category event rubric (total max 25).
    pub fn standard() -> Self {
        Self {
            categories: vec![
                Category {
                    id: TECHNICAL.to_string(),
                    label: "Technical Execution".to_string(),
                    max: 8,
                    levels: vec![
                        band(0, 0, "Not attempted", "Game doesn't run, crashes immediately, or has no functional choice system. Code is absent or completely broken."),
                        band(1, 2, "Minimal", "Game launches but has significant bugs that break gameplay. Branching barely works or is hardcoded incorrectly. Code is hard to follow."),
                        band(3, 4, "Developing", "Game is playable with some bugs. Some branches work but others may dead-end. Code shows effort but needs organization."),
                        band(5, 6, "Proficient", "Game runs smoothly with minor non-breaking bugs. Most choice branches lead to distinct outcomes. Code is organized and readable."),
                        band(7, 8, "Excellent", "Game runs smoothly with no crashes. Choices cleanly branch into meaningful outcomes. Code is well-organized and shows clear understanding of the engine."),
                    ],
                },
                Category {
                    id: CREATIVITY.to_string(),
                    label: "Creativity & Originality".to_string(),
                    max: 7,
                    levels: vec![
                        band(0, 0, "Not attempted", "No creative effort beyond the default template. No original concept, visuals, or story."),
                        band(1, 2, "Minimal", "Limited creative effort. Default or minimal visual design with no original concept. Feels like an unstarted project."),
                        band(3, 4, "Developing", "Some creative elements present. Visuals are basic but intentional. Concept is familiar but shows the team tried to make it their own."),
                        band(5, 5, "Proficient", "Clear creative vision: original world-building, characters, or story. Visuals feel cohesive and purposeful. Game stands out from a default project."),
                        band(6, 7, "Excellent", "Unique, memorable concept with strong creative identity. Visuals and audio are intentional and polished. This game would stand out at any beginner showcase."),
                    ],
                },
                Category {
                    id: THEME.to_string(),
                    label: "Theme Adherence".to_string(),
                    max: 6,
                    levels: vec![
                        band(0, 0, "Not attempted", "No meaningful player choices exist. The game is fully linear with no branching. The theme is absent."),
                        band(1, 2, "Minimal", "Choices exist in name only. They feel cosmetic and don't change what happens. Only one effective path through the game."),
                        band(3, 4, "Developing", "Choices have some impact, but paths lead to very similar outcomes. The theme of decisions shaping the story is present but underdeveloped."),
                        band(5, 5, "Proficient", "Player choices meaningfully change the story or outcome. At least 2 distinct paths or endings exist. The theme is clearly evident."),
                        band(6, 6, "Excellent", "Decisions feel genuinely consequential. Multiple branching paths and outcomes reinforce the theme in a creative and memorable way."),
                    ],
                },
                Category {
                    id: PRESENTATION.to_string(),
                    label: "Presentation".to_string(),
                    max: 4,
                    levels: vec![
                        band(0, 0, "Not attempted", "Team did not present or attempt to explain their game."),
                        band(1, 1, "Minimal", "Only one member presented. No live demo was attempted. Explanation was unclear or very incomplete."),
                        band(2, 2, "Developing", "Most members participated. The concept was explained but key details were missing. Demo was partial or struggled."),
                        band(3, 3, "Proficient", "All team members contributed. The game concept and choices were clearly explained. A live demo was shown with reasonable confidence."),
                        band(4, 4, "Excellent", "Confident, engaging presentation with all members contributing. Clearly explained game, choices, and theme. Live demo ran smoothly."),
                    ],
                },
            ],
        }
    }
}

fn band(min: u32, max: u32, label: &str, desc: &str) -> LevelBand {
    LevelBand {
        min,
        max,
        label: label.to_string(),
        desc: desc.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_total_max_is_25() {
        assert_eq!(Rubric::standard().total_max(), 25);
    }

    #[test]
    fn test_standard_category_order() {
        let rubric = Rubric::standard();
        let ids: Vec<&str> = rubric.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![TECHNICAL, CREATIVITY, THEME, PRESENTATION]);
    }

    #[test]
    fn test_level_for_boundaries() {
        let rubric = Rubric::standard();
        assert_eq!(rubric.level_for(TECHNICAL, 0).unwrap().label, "Not attempted");
        assert_eq!(rubric.level_for(TECHNICAL, 2).unwrap().label, "Minimal");
        assert_eq!(rubric.level_for(TECHNICAL, 3).unwrap().label, "Developing");
        assert_eq!(rubric.level_for(TECHNICAL, 8).unwrap().label, "Excellent");
    }

    #[test]
    fn test_level_for_unknown_category_is_config_error() {
        let rubric = Rubric::standard();
        let err = rubric.level_for("vibes", 1).unwrap_err();
        assert!(matches!(err, JudgingError::Config(_)));
    }

    #[test]
    fn test_level_for_out_of_range_value_is_config_error() {
        let rubric = Rubric::standard();
        let err = rubric.level_for(PRESENTATION, 5).unwrap_err();
        assert!(matches!(err, JudgingError::Config(_)));
    }

    #[test]
    fn test_total_for_treats_missing_as_zero() {
        let rubric = Rubric::standard();
        let mut sheet = ScoreSheet::new();
        sheet.insert(TECHNICAL.to_string(), 6);
        sheet.insert(THEME.to_string(), 4);
        assert_eq!(rubric.total_for(&sheet), 10);
        assert!(!rubric.is_complete(&sheet));
    }

    #[test]
    fn test_complete_sheet_total_in_range() {
        let rubric = Rubric::standard();
        let mut sheet = ScoreSheet::new();
        for category in &rubric.categories {
            sheet.insert(category.id.clone(), category.max);
        }
        assert!(rubric.is_complete(&sheet));
        assert_eq!(rubric.total_for(&sheet), rubric.total_max());
    }
}

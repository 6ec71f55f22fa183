pub mod model;
pub mod validation;

pub use model::{
    Category, LevelBand, Rubric, ScoreSheet, CREATIVITY, PRESENTATION, TECHNICAL, THEME,
};
pub use validation::validate_rubric;

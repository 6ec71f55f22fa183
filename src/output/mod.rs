pub mod formatter;

pub use formatter::{
    format_average, format_awards, format_breakdown, format_leaderboard, format_rankings,
    format_status, should_use_colors,
};

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::aggregate::Aggregate;
use crate::rubric::Rubric;
use crate::service::Ping;
use crate::store::JudgingState;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// "18.5" for a defined average, "-" for an unscored team
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("{:.1}", avg),
        None => "-".to_string(),
    }
}

/// 1-based leaderboard position: "#1", "#2", ...
fn place(index: usize) -> String {
    format!("#{}", index + 1)
}

fn award_chips(team: &str, agg: &Aggregate) -> Vec<&'static str> {
    let mut chips = Vec::new();
    if agg.awards.top_technical.as_deref() == Some(team) {
        chips.push("Top Technical");
    }
    if agg.awards.top_creative.as_deref() == Some(team) {
        chips.push("Top Creative");
    }
    if agg.awards.most_inspirational.as_deref() == Some(team) {
        chips.push("Most Inspirational");
    }
    chips
}

/// Format the combined leaderboard, one line per team: position, team,
/// average/max, judge count, average rank, split badge, award chips.
pub fn format_leaderboard(agg: &Aggregate, rubric: &Rubric, use_colors: bool) -> String {
    if agg.leaderboard.is_empty() {
        return "No teams yet.".to_string();
    }

    let term_width = get_terminal_width();
    let name_width = term_width.map(|w| (w / 3).clamp(12, 40)).unwrap_or(0);
    let total_max = rubric.total_max();

    agg.leaderboard
        .iter()
        .enumerate()
        .map(|(idx, ts)| {
            let pos = format!("{:>3}", place(idx));
            let name = if name_width > 0 {
                format!(
                    "{:<width$}",
                    truncate_name(&ts.team, name_width),
                    width = name_width
                )
            } else {
                ts.team.clone()
            };
            let score = format!("{:>5} /{}", format_average(ts.average), total_max);
            let judges = format!("{} judge{}", ts.judge_count(), plural(ts.judge_count()));
            let rank = match ts.average_rank {
                Some(avg) => format!("avg rank #{:.1}", avg),
                None => "unranked".to_string(),
            };

            let mut line = if use_colors {
                format!(
                    "{}  {}  {}  {}  {}",
                    pos.dimmed(),
                    name.bold(),
                    score.bold(),
                    judges.dimmed(),
                    rank.cyan()
                )
            } else {
                format!("{}  {}  {}  {}  {}", pos, name, score, judges, rank)
            };

            if ts.outlier {
                line.push_str("  ");
                if use_colors {
                    line.push_str(&"SPLIT".red().to_string());
                } else {
                    line.push_str("SPLIT");
                }
            }
            for chip in award_chips(&ts.team, agg) {
                line.push_str("  ");
                if use_colors {
                    line.push_str(&format!("[{}]", chip).yellow().to_string());
                } else {
                    line.push_str(&format!("[{}]", chip));
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-team, per-category breakdown with one column per judge.
pub fn format_breakdown(
    state: &JudgingState,
    rubric: &Rubric,
    agg: &Aggregate,
    use_colors: bool,
) -> String {
    if agg.leaderboard.is_empty() {
        return "No teams yet.".to_string();
    }

    let mut out = Vec::new();
    for ts in &agg.leaderboard {
        if use_colors {
            out.push(ts.team.bold().to_string());
        } else {
            out.push(ts.team.clone());
        }

        for (category, cat_stats) in rubric.categories.iter().zip(&ts.categories) {
            let cells: Vec<String> = state
                .judges
                .iter()
                .map(|judge| {
                    match state
                        .scores
                        .get(judge)
                        .and_then(|s| s.get(&ts.team))
                        .and_then(|sheet| sheet.get(&category.id))
                    {
                        Some(v) => format!("{:>3}", v),
                        None => format!("{:>3}", "-"),
                    }
                })
                .collect();
            let marker = if cat_stats.outlier { " !" } else { "" };
            let line = format!(
                "  {:<24} {}  avg {:>5}{}",
                format!("{} /{}", category.label, category.max),
                cells.join(" "),
                format_average(cat_stats.average),
                marker
            );
            if use_colors && cat_stats.outlier {
                out.push(line.red().to_string());
            } else {
                out.push(line);
            }
        }

        let total_cells: Vec<String> = state
            .judges
            .iter()
            .map(|judge| {
                let sheet = state.scores.get(judge).and_then(|s| s.get(&ts.team));
                match sheet {
                    Some(sheet) if rubric.is_complete(sheet) => {
                        format!("{:>3}", rubric.total_for(sheet))
                    }
                    Some(_) => format!("{:>3}", "*"), // partial, not counted
                    None => format!("{:>3}", "-"),
                }
            })
            .collect();
        let marker = if ts.outlier { " !" } else { "" };
        out.push(format!(
            "  {:<24} {}  avg {:>5}{}",
            "TOTAL",
            total_cells.join(" "),
            format_average(ts.average),
            marker
        ));
        out.push(String::new());
    }
    out.pop(); // drop trailing blank line
    out.join("\n")
}

/// Per-judge rank positions for each team, leaderboard order.
pub fn format_rankings(state: &JudgingState, agg: &Aggregate, use_colors: bool) -> String {
    if agg.leaderboard.is_empty() {
        return "No teams yet.".to_string();
    }

    agg.leaderboard
        .iter()
        .map(|ts| {
            let cells: Vec<String> = state
                .judges
                .iter()
                .map(|judge| {
                    let position = state.rankings.get(judge).and_then(|r| {
                        crate::aggregate::filtered_ranking(r, state)
                            .iter()
                            .position(|t| t == &ts.team)
                    });
                    match position {
                        Some(p) => format!("{:>3}", place(p)),
                        None => format!("{:>3}", "-"),
                    }
                })
                .collect();
            let avg = match ts.average_rank {
                Some(a) => format!("avg #{:.1}", a),
                None => "unranked".to_string(),
            };
            if use_colors {
                format!("{:<20} {}  {}", ts.team.bold(), cells.join(" "), avg.cyan())
            } else {
                format!("{:<20} {}  {}", ts.team, cells.join(" "), avg)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Award winners, one per line.
pub fn format_awards(agg: &Aggregate, use_colors: bool) -> String {
    let rows = [
        ("Top Technical", &agg.awards.top_technical),
        ("Top Creative", &agg.awards.top_creative),
        ("Most Inspirational", &agg.awards.most_inspirational),
    ];

    rows.iter()
        .map(|(label, winner)| {
            let name = winner.as_deref().unwrap_or("(awaiting scores)");
            if use_colors {
                format!("{:<20} {}", label.yellow(), name.bold())
            } else {
                format!("{:<20} {}", label, name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dashboard summary plus the liveness probe line.
pub fn format_status(agg: &Aggregate, ping: &Ping, use_colors: bool) -> String {
    let summary = &agg.summary;
    let leader = summary.leader.as_deref().unwrap_or("-");
    let body = format!(
        "Teams: {}\nJudges submitted: {}/{}\nDisagreements: {}\nCurrent leader: {}\nPing: ok={} at {}",
        summary.team_count,
        summary.judges_done,
        summary.judge_count,
        summary.outlier_teams,
        leader,
        ping.ok,
        ping.time.to_rfc3339()
    );
    if use_colors && summary.outlier_teams > 0 {
        // Highlight the disagreement line so the operator spots it
        body.lines()
            .map(|line| {
                if line.starts_with("Disagreements") {
                    line.red().to_string()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        body
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::rubric::ScoreSheet;
    use crate::store::SubmitPayload;
    use std::collections::BTreeMap;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn full_sheet(technical: u32, creativity: u32, theme: u32, presentation: u32) -> ScoreSheet {
        let mut sheet = ScoreSheet::new();
        sheet.insert("technical".to_string(), technical);
        sheet.insert("creativity".to_string(), creativity);
        sheet.insert("theme".to_string(), theme);
        sheet.insert("presentation".to_string(), presentation);
        sheet
    }

    fn sample_state() -> (JudgingState, Rubric) {
        let rubric = Rubric::standard();
        let mut state = JudgingState::new();
        state.set_teams(names(&["Nova", "Quasar"])).unwrap();
        state.set_judges(names(&["Ada"])).unwrap();
        let mut scores = BTreeMap::new();
        scores.insert("Nova".to_string(), full_sheet(6, 5, 4, 3));
        scores.insert("Quasar".to_string(), full_sheet(8, 6, 5, 4));
        state
            .submit_scores(
                "Ada",
                SubmitPayload {
                    scores,
                    ranking: names(&["Quasar", "Nova"]),
                },
                &rubric,
            )
            .unwrap();
        (state, rubric)
    }

    #[test]
    fn test_leaderboard_plain_output() {
        let (state, rubric) = sample_state();
        let agg = aggregate(&state, &rubric);
        let out = format_leaderboard(&agg, &rubric, false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("#1"));
        assert!(lines[0].contains("Quasar"));
        assert!(lines[0].contains("23.0 /25"));
        assert!(lines[1].contains("Nova"));
        assert!(lines[1].contains("18.0 /25"));
    }

    #[test]
    fn test_leaderboard_empty() {
        let rubric = Rubric::standard();
        let agg = aggregate(&JudgingState::new(), &rubric);
        assert_eq!(format_leaderboard(&agg, &rubric, false), "No teams yet.");
    }

    #[test]
    fn test_breakdown_shows_partial_marker() {
        let rubric = Rubric::standard();
        let mut state = JudgingState::new();
        state.set_teams(names(&["Nova"])).unwrap();
        state.set_judges(names(&["Ada"])).unwrap();
        let mut sheet = ScoreSheet::new();
        sheet.insert("technical".to_string(), 6);
        let mut scores = BTreeMap::new();
        scores.insert("Nova".to_string(), sheet);
        state
            .submit_scores(
                "Ada",
                SubmitPayload {
                    scores,
                    ranking: names(&["Nova"]),
                },
                &rubric,
            )
            .unwrap();

        let agg = aggregate(&state, &rubric);
        let out = format_breakdown(&state, &rubric, &agg, false);
        // Partial sheets render as * in the TOTAL row, never as a number
        let total_line = out.lines().find(|l| l.contains("TOTAL")).unwrap();
        assert!(total_line.contains('*'));
    }

    #[test]
    fn test_rankings_output() {
        let (state, rubric) = sample_state();
        let agg = aggregate(&state, &rubric);
        let out = format_rankings(&state, &agg, false);
        let quasar = out.lines().find(|l| l.contains("Quasar")).unwrap();
        assert!(quasar.contains("#1"));
        assert!(quasar.contains("avg #1.0"));
    }

    #[test]
    fn test_awards_output_with_and_without_winners() {
        let (state, rubric) = sample_state();
        let agg = aggregate(&state, &rubric);
        let out = format_awards(&agg, false);
        assert!(out.contains("Top Technical"));
        assert!(out.contains("Quasar"));

        let empty = aggregate(&JudgingState::new(), &rubric);
        let out = format_awards(&empty, false);
        assert!(out.contains("(awaiting scores)"));
    }

    #[test]
    fn test_status_output() {
        let (state, rubric) = sample_state();
        let agg = aggregate(&state, &rubric);
        let ping = Ping {
            ok: true,
            time: chrono::Utc::now(),
        };
        let out = format_status(&agg, &ping, false);
        assert!(out.contains("Judges submitted: 1/1"));
        assert!(out.contains("Current leader: Quasar"));
        assert!(out.contains("ok=true"));
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Nova", 10), "Nova");
        assert_eq!(truncate_name("A Very Long Team Name", 10), "A Very ...");
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(Some(20.5)), "20.5");
        assert_eq!(format_average(None), "-");
    }
}

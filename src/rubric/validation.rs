use std::collections::HashSet;

use super::model::Rubric;

/// Validate a rubric definition at startup.
/// Returns all validation errors at once (not just the first).
///
/// The bands of each category must partition `[0, max]` exactly:
/// ordered, contiguous, no gaps, no overlaps.
pub fn validate_rubric(rubric: &Rubric) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if rubric.categories.is_empty() {
        errors.push("rubric: must define at least one category".to_string());
    }

    let mut seen_ids = HashSet::new();
    for (i, category) in rubric.categories.iter().enumerate() {
        let path = format!("rubric.categories[{}]", i);

        if category.id.trim().is_empty() {
            errors.push(format!("{}.id: must be non-empty", path));
        }
        if !seen_ids.insert(category.id.as_str()) {
            errors.push(format!("{}.id: duplicate id '{}'", path, category.id));
        }
        if category.max == 0 {
            errors.push(format!("{}.max: must be positive", path));
        }

        if category.levels.is_empty() {
            errors.push(format!("{}.levels: must define at least one band", path));
            continue;
        }

        // Bands must start at 0, end at max, and chain without gap or overlap
        let first = &category.levels[0];
        if first.min != 0 {
            errors.push(format!(
                "{}.levels[0]: must start at 0, starts at {}",
                path, first.min
            ));
        }
        for (j, band) in category.levels.iter().enumerate() {
            if band.min > band.max {
                errors.push(format!(
                    "{}.levels[{}]: empty range {}..={}",
                    path, j, band.min, band.max
                ));
            }
            if j + 1 < category.levels.len() {
                let next = &category.levels[j + 1];
                if next.min != band.max + 1 {
                    errors.push(format!(
                        "{}.levels[{}]: band starts at {} but previous ends at {} (gap or overlap)",
                        path,
                        j + 1,
                        next.min,
                        band.max
                    ));
                }
            }
        }
        if let Some(last) = category.levels.last() {
            if last.max != category.max {
                errors.push(format!(
                    "{}.levels: last band ends at {} but category max is {}",
                    path, last.max, category.max
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! `classes.txt` codec.
//!
//! Generation writes one name per line ordered by class id, filling id gaps
//! with empty lines so that line number equals class id. Parsing assigns
//! sequential ids to the non-empty lines in file order and therefore does
//! not restore gaps.

use crate::model::{ClassDef, ClassId};

/// Render the class list as `classes.txt` content (no trailing newline).
pub fn classes_to_text(classes: &[ClassDef]) -> String {
    let Some(max_id) = classes.iter().map(|c| c.id).max() else {
        return String::new();
    };

    let mut lines = vec![""; max_id as usize + 1];
    for class in classes {
        lines[class.id as usize] = class.name.as_str();
    }
    lines.join("\n")
}

/// Parse `classes.txt` content into classes with ids `0..N-1`.
pub fn parse_classes_text(content: &str) -> Vec<ClassDef> {
    let classes: Vec<ClassDef> = content
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .enumerate()
        .map(|(idx, name)| ClassDef::new(idx as ClassId, name))
        .collect();

    let blank = content.lines().filter(|l| l.trim().is_empty()).count();
    if blank > 0 {
        log::debug!(
            "classes.txt: skipped {} blank line(s), ids reassigned sequentially",
            blank
        );
    }
    classes
}

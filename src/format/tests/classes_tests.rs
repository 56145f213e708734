//! Tests for the classes.txt codec.

use crate::format::{classes_to_text, parse_classes_text};
use crate::model::ClassDef;

#[test]
fn test_classes_to_text_in_id_order() {
    let classes = vec![
        ClassDef::new(1, "car"),
        ClassDef::new(0, "person"),
        ClassDef::new(2, "bicycle"),
    ];
    assert_eq!(classes_to_text(&classes), "person\ncar\nbicycle");
}

#[test]
fn test_classes_to_text_fills_gaps() {
    let classes = vec![ClassDef::new(0, "dog"), ClassDef::new(2, "cat")];
    let text = classes_to_text(&classes);
    assert_eq!(text, "dog\n\ncat");
    assert_eq!(text.split('\n').collect::<Vec<_>>(), vec!["dog", "", "cat"]);
}

#[test]
fn test_classes_to_text_empty() {
    assert_eq!(classes_to_text(&[]), "");
}

#[test]
fn test_parse_classes_text_sequential_ids() {
    let classes = parse_classes_text("person\ncar\r\n  bicycle  \n");
    let names: Vec<_> = classes.iter().map(|c| (c.id, c.name.as_str())).collect();
    assert_eq!(names, vec![(0, "person"), (1, "car"), (2, "bicycle")]);
}

#[test]
fn test_gap_asymmetry_is_pinned() {
    // Generation keeps id 2 on line 2; parsing compacts it to id 1.
    let classes = vec![ClassDef::new(0, "dog"), ClassDef::new(2, "cat")];
    let reparsed = parse_classes_text(&classes_to_text(&classes));
    let names: Vec<_> = reparsed.iter().map(|c| (c.id, c.name.as_str())).collect();
    assert_eq!(names, vec![(0, "dog"), (1, "cat")]);
}

//! Tests for the typed project file boundary.

use crate::format::{FormatError, ProjectFile};
use crate::geometry::Rect;
use crate::model::{BoxAnnotation, BoxId, ClassDef, ImageId, ImageRecord, ImageStatus};

fn sample_file() -> ProjectFile {
    ProjectFile {
        version: ProjectFile::CURRENT_VERSION,
        name: "demo".to_string(),
        created_at: 1,
        updated_at: 2,
        images: vec![ImageRecord {
            id: ImageId(1),
            name: "a.jpg".to_string(),
            width: 640,
            height: 480,
            uri: "blob:a".to_string(),
            status: ImageStatus::Labeled,
            provenance: None,
            created_at: 1,
            updated_at: 2,
        }],
        classes: vec![ClassDef::new(0, "car")],
        boxes: vec![BoxAnnotation::new(
            BoxId(1),
            ImageId(1),
            0,
            Rect::new(10.0, 20.0, 30.0, 40.0),
        )],
    }
}

#[test]
fn test_project_file_json_round_trip() {
    let file = sample_file();
    let json = file.to_json().unwrap();
    assert!(json.contains("\"labeled\""));
    assert!(!json.contains("locked"), "default flags are omitted");
    assert_eq!(ProjectFile::from_json(&json).unwrap(), file);
}

#[test]
fn test_project_file_rejects_unknown_fields() {
    let json = sample_file().to_json().unwrap();
    let tampered = json.replacen("\"class_id\": 0", "\"class_id\": 0, \"points\": []", 1);
    assert!(matches!(
        ProjectFile::from_json(&tampered),
        Err(FormatError::Json(_))
    ));
}

#[test]
fn test_project_file_rejects_wrong_shape() {
    let json = r#"{"version":1,"name":"x","created_at":0,"updated_at":0,"boxes":[{"id":"abc"}]}"#;
    assert!(matches!(ProjectFile::from_json(json), Err(FormatError::Json(_))));
}

#[test]
fn test_project_file_rejects_other_versions() {
    let mut file = sample_file();
    file.version = 7;
    let json = serde_json::to_string(&file).unwrap();
    assert!(matches!(
        ProjectFile::from_json(&json),
        Err(FormatError::UnsupportedVersion { expected: 1, found: 7 })
    ));
}

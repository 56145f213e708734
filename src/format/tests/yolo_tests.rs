//! Tests for the YOLO codec.

use crate::format::{
    FormatError, YoloBox, YoloLineError, image_to_yolo_text, parse_yolo_file, parse_yolo_line,
    to_yolo_line, validate_yolo_values,
};
use crate::geometry::Rect;
use crate::model::{BoxAnnotation, BoxId, ImageId};

const EPSILON: f64 = 1e-6;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn make_box(id: u64, class_id: u32, rect: Rect) -> BoxAnnotation {
    BoxAnnotation::new(BoxId(id), ImageId(1), class_id, rect)
}

#[test]
fn test_to_yolo_line_example() {
    let b = make_box(1, 0, Rect::new(100.0, 100.0, 200.0, 120.0));
    assert_eq!(
        to_yolo_line(&b, 1000, 800),
        "0 0.200000 0.200000 0.200000 0.150000"
    );
}

#[test]
fn test_to_yolo_line_six_decimals() {
    let b = make_box(1, 3, Rect::new(100.0, 120.0, 80.0, 200.0));
    // (100 + 40) / 640, (120 + 100) / 480, 80 / 640, 200 / 480
    assert_eq!(
        to_yolo_line(&b, 640, 480),
        "3 0.218750 0.458333 0.125000 0.416667"
    );
}

#[test]
fn test_to_yolo_line_clamps_values() {
    // Out-of-bounds box is clamped per field rather than rejected
    let b = make_box(1, 0, Rect::new(-10.0, 0.0, 400.0, 50.0));
    let line = to_yolo_line(&b, 200, 100);
    assert_eq!(line, "0 0.950000 0.250000 1.000000 0.500000");
}

#[test]
fn test_to_yolo_line_never_prints_negative_zero() {
    let b = make_box(1, 0, Rect::new(-1.0, -1.0, 1e-9, 1e-9));
    let line = to_yolo_line(&b, 100, 100);
    assert!(!line.contains('-'), "unexpected sign in {line}");
}

#[test]
fn test_empty_outputs() {
    let b = make_box(1, 0, Rect::new(10.0, 10.0, 20.0, 20.0));
    assert_eq!(image_to_yolo_text(&[], 640, 480), "");
    assert_eq!(image_to_yolo_text(&[b.clone()], 0, 480), "");
    assert_eq!(to_yolo_line(&b, 640, 0), "");
}

#[test]
fn test_image_to_yolo_text_joins_lines() {
    let boxes = vec![
        make_box(1, 0, Rect::new(0.0, 0.0, 100.0, 100.0)),
        make_box(2, 1, Rect::new(100.0, 100.0, 100.0, 100.0)),
    ];
    let text = image_to_yolo_text(&boxes, 200, 200);
    assert_eq!(
        text,
        "0 0.250000 0.250000 0.500000 0.500000\n1 0.750000 0.750000 0.500000 0.500000"
    );
    assert!(!text.ends_with('\n'));
}

#[test]
fn test_parse_yolo_line_to_pixels() {
    let parsed = parse_yolo_line("2 0.5 0.5 0.2 0.3", 1000, 1000).unwrap();
    assert_eq!(parsed.class_id, 2);
    assert!(approx_eq(parsed.rect.x, 400.0));
    assert!(approx_eq(parsed.rect.y, 350.0));
    assert!(approx_eq(parsed.rect.w, 200.0));
    assert!(approx_eq(parsed.rect.h, 300.0));
}

#[test]
fn test_parse_yolo_line_clips_to_image() {
    // Center near the left edge: x would be negative
    let parsed = parse_yolo_line("0 0.05 0.5 0.2 0.2", 100, 100).unwrap();
    assert!(approx_eq(parsed.rect.x, 0.0));
    assert!(approx_eq(parsed.rect.w, 15.0));
    assert!(parsed.rect.right() <= 100.0);
}

#[test]
fn test_parse_yolo_line_field_count() {
    assert_eq!(
        parse_yolo_line("0 0.5 0.5 0.2", 100, 100),
        Err(YoloLineError::FieldCount { found: 4 })
    );
    assert_eq!(
        parse_yolo_line("0 0.5 0.5 0.2 0.2 0.9", 100, 100),
        Err(YoloLineError::FieldCount { found: 6 })
    );
}

#[test]
fn test_parse_yolo_line_rejects_bad_class_ids() {
    for token in ["-1", "1.5", "cat"] {
        let line = format!("{token} 0.5 0.5 0.2 0.2");
        assert!(matches!(
            parse_yolo_line(&line, 100, 100),
            Err(YoloLineError::InvalidClassId { .. })
        ));
    }
}

#[test]
fn test_parse_yolo_line_rejects_bad_numbers() {
    assert!(matches!(
        parse_yolo_line("0 abc 0.5 0.2 0.2", 100, 100),
        Err(YoloLineError::InvalidNumber { field: "x_center", .. })
    ));
    assert!(matches!(
        parse_yolo_line("0 0.5 0.5 NaN 0.2", 100, 100),
        Err(YoloLineError::OutOfRange { field: "width", .. })
    ));
}

#[test]
fn test_parse_yolo_line_out_of_range() {
    assert!(matches!(
        parse_yolo_line("1 1.500000 0.500000 0.200000 0.200000", 800, 600),
        Err(YoloLineError::OutOfRange { field: "x_center", .. })
    ));
}

#[test]
fn test_parse_yolo_line_rejects_zero_size() {
    assert_eq!(
        parse_yolo_line("0 0.5 0.5 0.0 0.2", 100, 100),
        Err(YoloLineError::Degenerate)
    );
}

#[test]
fn test_parse_file_skips_bad_lines() {
    let content = "0 0.5 0.5 0.2 0.2\n\
                   1 1.500000 0.500000 0.200000 0.200000\n\
                   \n\
                   garbage\n\
                   2 0.25 0.25 0.1 0.1\n";
    let report = parse_yolo_file(content, 800, 600).unwrap();

    assert_eq!(report.boxes.len(), 2);
    assert_eq!(report.boxes[0].class_id, 0);
    assert_eq!(report.boxes[1].class_id, 2);

    assert_eq!(report.diagnostics.len(), 2);
    assert_eq!(report.diagnostics[0].line, 2);
    assert_eq!(report.diagnostics[1].line, 4);
    assert_eq!(
        report.diagnostics[1].error,
        YoloLineError::FieldCount { found: 1 }
    );
    assert!(!report.is_clean());
}

#[test]
fn test_parse_file_only_bad_lines() {
    let report = parse_yolo_file("1 1.500000 0.500000 0.200000 0.200000", 800, 600).unwrap();
    assert!(report.boxes.is_empty());
    assert_eq!(report.diagnostics.len(), 1);
}

#[test]
fn test_parse_file_handles_crlf() {
    let report = parse_yolo_file("0 0.5 0.5 0.2 0.2\r\n1 0.5 0.5 0.2 0.2\r\n", 100, 100).unwrap();
    assert_eq!(report.boxes.len(), 2);
    assert!(report.is_clean());
}

#[test]
fn test_parse_file_requires_dimensions() {
    assert!(matches!(
        parse_yolo_file("0 0.5 0.5 0.2 0.2", 0, 100),
        Err(FormatError::InvalidDimensions { width: 0, height: 100 })
    ));
}

#[test]
fn test_validate_yolo_values() {
    assert!(validate_yolo_values(0.0, 1.0, 0.5, 0.5).is_ok());
    assert!(validate_yolo_values(0.5, 0.5, 1.01, 0.5).is_err());
    assert!(validate_yolo_values(-0.01, 0.5, 0.5, 0.5).is_err());
}

#[test]
fn test_yolo_box_none_for_invalid_dimensions() {
    assert!(YoloBox::from_pixel_rect(0, Rect::new(0.0, 0.0, 1.0, 1.0), 0, 10).is_none());
}

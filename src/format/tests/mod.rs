//! Unit tests for the annotation text formats.
//!
//! These tests pin the exact serialized text, the per-line error recovery
//! and the pixel/normalized round trip.

mod classes_tests;
mod project_file_tests;
mod yolo_tests;

//! CLI presentation: text and json formatters for reconcile runs and previews.

use crate::error::ApiError;
use crate::reconcile::{ReconcilePreview, ReconcileReport};
use serde_json::json;
use std::path::{Path, PathBuf};

fn serialize_error(e: serde_json::Error) -> ApiError {
    ApiError::ConfigError(format!("Failed to serialize output: {}", e))
}

fn to_json(value: serde_json::Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(&value).map_err(serialize_error)
}

fn push_paths(output: &mut String, marker: &str, suffix: &str, paths: &[PathBuf]) {
    for path in paths {
        output.push_str(&format!("  {} {}{}\n", marker, path.display(), suffix));
    }
}

pub fn format_report_text(report: &ReconcileReport, dest: &Path) -> String {
    let mut output = format!(
        "Applied '{}' to {}\n\n",
        report.policy,
        dest.display()
    );

    if !report.directories.is_empty() {
        output.push_str("Directories:\n");
        push_paths(&mut output, "✓", "/", &report.directories);
        output.push('\n');
    }

    if report.files_changed() > 0 {
        output.push_str("Files:\n");
        push_paths(&mut output, "✓", " (created)", &report.created);
        push_paths(&mut output, "✓", " (written)", &report.written);
        output.push('\n');
    }

    if !report.skipped.is_empty() {
        output.push_str("Skipped:\n");
        push_paths(&mut output, "⊘", " (left untouched)", &report.skipped);
        output.push('\n');
    }

    output.push_str(&format!(
        "{} directories, {} files changed, {} skipped",
        report.directories.len(),
        report.files_changed(),
        report.skipped.len()
    ));
    output
}

pub fn format_report_json(report: &ReconcileReport, dest: &Path) -> Result<String, ApiError> {
    let report = serde_json::to_value(report).map_err(serialize_error)?;
    to_json(json!({
        "destination": dest.display().to_string(),
        "completed_at": chrono::Utc::now().to_rfc3339(),
        "report": report,
    }))
}

pub fn format_preview_text(preview: &ReconcilePreview, dest: &Path) -> String {
    let mut output = format!(
        "Preview of '{}' against {}\n\n",
        preview.policy,
        dest.display()
    );

    if preview.is_noop() {
        output.push_str("Nothing to do; the destination already matches.\n");
        return output;
    }

    if !preview.missing_directories.is_empty() {
        output.push_str("Would create directories:\n");
        push_paths(&mut output, "-", "/", &preview.missing_directories);
        output.push('\n');
    }
    if !preview.conflicts.is_empty() {
        output.push_str("Blocked (not a directory at destination):\n");
        push_paths(&mut output, "✗", "", &preview.conflicts);
        output.push('\n');
    }
    if !preview.would_create.is_empty() {
        output.push_str("Would create files:\n");
        push_paths(&mut output, "-", "", &preview.would_create);
        output.push('\n');
    }
    if !preview.would_overwrite.is_empty() {
        output.push_str("Would overwrite files:\n");
        push_paths(&mut output, "!", "", &preview.would_overwrite);
        output.push('\n');
    }

    output.push_str(&format!(
        "Run 'unfurl {}' to apply.\n",
        preview.policy
    ));
    output
}

pub fn format_preview_json(preview: &ReconcilePreview, dest: &Path) -> Result<String, ApiError> {
    let preview = serde_json::to_value(preview).map_err(serialize_error)?;
    to_json(json!({
        "destination": dest.display().to_string(),
        "preview": preview,
    }))
}

//! HTML rendering for the upload page
//!
//! The page is rendered server-side from an optional [`UploadOutcome`]:
//! `None` is the initial empty form, `Some` adds the result panel below it.
//! Plain HTML form, no JavaScript required.

use crate::upload::{AllowedExtension, UploadOutcome, UploadSuccess, FILE_FIELD};
use mfcc_extractor::MfccMatrix;

pub const PAGE_TITLE: &str = "MFCC Extraction App";
pub const INSTRUCTIONS: &str = "Upload an audio file to extract MFCC features:";
pub const PICKER_LABEL: &str = "Choose an audio file";
pub const SUCCESS_NOTICE: &str = "MFCCs extracted successfully!";
pub const ERROR_PREFIX: &str = "An error occurred: ";
pub const REJECTED_PREFIX: &str = "Upload rejected: ";

const STYLE: &str = r#"
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 900px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 {
            color: #333;
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }
        form {
            background: #f5f5f5;
            padding: 20px;
            border-radius: 4px;
        }
        button {
            padding: 8px 20px;
            background: #0066cc;
            color: white;
            border: none;
            border-radius: 4px;
            cursor: pointer;
        }
        button:hover {
            background: #0052a3;
        }
        .notice {
            padding: 12px 16px;
            border-radius: 4px;
            margin: 20px 0 10px 0;
        }
        .success {
            background: #e6f4ea;
            color: #1e4620;
        }
        .error {
            background: #fdecea;
            color: #611a15;
        }
        .meta {
            color: #666;
            font-size: 0.9em;
        }
        pre {
            background: #272822;
            color: #f8f8f2;
            padding: 16px;
            border-radius: 4px;
            max-height: 600px;
            overflow: auto;
            font-size: 12px;
        }
"#;

/// Render the full upload page
pub fn render_page(outcome: Option<&UploadOutcome>) -> String {
    let result_panel = outcome.map(render_outcome).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <h1>{title}</h1>
    <p>{instructions}</p>

    <form method="post" action="/extract" enctype="multipart/form-data">
        <label for="{field}">{label}</label><br>
        <input type="file" id="{field}" name="{field}" accept="{accept}" required>
        <button type="submit">Extract MFCCs</button>
        <p class="meta">Accepted formats: {formats}</p>
    </form>
{result_panel}
</body>
</html>
"#,
        title = PAGE_TITLE,
        style = STYLE,
        instructions = INSTRUCTIONS,
        field = FILE_FIELD,
        label = PICKER_LABEL,
        accept = AllowedExtension::accept_attribute(),
        formats = AllowedExtension::ALL
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        result_panel = result_panel,
    )
}

/// Result panel for one outcome
pub fn render_outcome(outcome: &UploadOutcome) -> String {
    match outcome {
        UploadOutcome::Success(success) => render_success(success),
        UploadOutcome::Rejected { message } => format!(
            "    <div class=\"notice error\" role=\"alert\">{}{}</div>\n",
            REJECTED_PREFIX,
            escape_html(message)
        ),
        UploadOutcome::Failed { message } => format!(
            "    <div class=\"notice error\" role=\"alert\">{}{}</div>\n",
            ERROR_PREFIX,
            escape_html(message)
        ),
    }
}

fn render_success(success: &UploadSuccess) -> String {
    let channel_label = if success.channels == 1 { "channel" } else { "channels" };
    format!(
        r#"    <div class="notice success">{notice}</div>
    <p class="meta">{file} &middot; {rate} Hz &middot; {channels} {channel_label} &middot; {duration:.2} s &middot; {rows} &times; {cols} (coefficients &times; frames)</p>
    <pre id="mfcc-json">{json}</pre>
"#,
        notice = SUCCESS_NOTICE,
        file = escape_html(&success.file_name),
        rate = success.sample_rate,
        channels = success.channels,
        channel_label = channel_label,
        duration = success.duration_seconds,
        rows = success.shape[0],
        cols = success.shape[1],
        json = escape_html(&matrix_json(&success.mfcc)),
    )
}

/// JSON text of the matrix, one coefficient row per line
pub fn matrix_json(matrix: &MfccMatrix) -> String {
    let rows: Vec<String> = matrix
        .rows()
        .iter()
        .map(|row| serde_json::to_string(row).unwrap_or_else(|_| "[]".to_string()))
        .collect();

    if rows.is_empty() {
        return "[]".to_string();
    }
    format!("[\n  {}\n]", rows.join(",\n  "))
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

//! Server-rendered HTML pages

use axum::http::StatusCode;
use certcheck_core::constants::UPLOADS_URL_PREFIX;
use certcheck_core::{SubmissionFields, SubmissionRecord, Verdict};

use crate::constants::STYLESHEET_PATH;

pub const STYLESHEET: &str = include_str!("../ui/style.css");

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// URL of a stored upload as served by the static file route
pub fn upload_url(filename: &str) -> String {
    format!("{}/{}", UPLOADS_URL_PREFIX, urlencoding::encode(filename))
}

/// Location of the result page for a classified upload
pub fn result_path(verdict: Verdict, filename: &str) -> String {
    format!("/uploads/{}/{}", verdict, urlencoding::encode(filename))
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | certcheck</title>
    <link rel="stylesheet" href="{stylesheet}">
</head>
<body>
    <header>
        <a class="brand" href="/">certcheck</a>
        <a href="/upload">Upload</a>
        <a href="/view">Submissions</a>
        <a href="/about">About</a>
    </header>
    <main>
{body}
    </main>
</body>
</html>
"#,
        title = escape_html(title),
        stylesheet = STYLESHEET_PATH,
        body = body,
    )
}

pub fn home() -> String {
    layout(
        "Home",
        r#"        <h1>Document verification</h1>
        <p>Upload a scanned certificate or document and the classifier will tell you
        whether it looks genuine.</p>
        <p><a href="/upload">Upload a document</a> or <a href="/view">browse past submissions</a>.</p>"#,
    )
}

pub fn about() -> String {
    layout(
        "About",
        r#"        <h1>About</h1>
        <p>Each upload is resized to 224&times;224 pixels and scored by a pre-trained
        binary image classifier. Scores above the configured threshold are reported as
        <strong>Real</strong>, all others as <strong>Fake</strong>.</p>
        <p>Accepted file types are PNG, JPG, JPEG and GIF. Submitted details and file
        names are kept so they can be reviewed and deleted from the submissions page.</p>"#,
    )
}

/// The upload form, optionally pre-filled and with a rejection notice.
pub fn upload_form(fields: &SubmissionFields, error: Option<&str>) -> String {
    let notice = error
        .map(|msg| format!(r#"        <p class="notice">{}</p>"#, escape_html(msg)))
        .unwrap_or_default();

    let body = format!(
        r#"        <h1>Upload a document</h1>
{notice}
        <form class="upload" method="post" action="/upload" enctype="multipart/form-data">
            <label for="name">Name</label>
            <input type="text" id="name" name="name" value="{name}" required>
            <label for="branch">Branch</label>
            <input type="text" id="branch" name="branch" value="{branch}" required>
            <label for="email">Email</label>
            <input type="email" id="email" name="email" value="{email}" required>
            <label for="subject">Subject</label>
            <input type="text" id="subject" name="subject" value="{subject}" required>
            <label for="file">Document image</label>
            <input type="file" id="file" name="file" accept=".png,.jpg,.jpeg,.gif" required>
            <button type="submit">Upload and classify</button>
        </form>"#,
        notice = notice,
        name = escape_html(&fields.name),
        branch = escape_html(&fields.branch),
        email = escape_html(&fields.email),
        subject = escape_html(&fields.subject),
    );
    layout("Upload", &body)
}

pub fn result(verdict: Verdict, filename: &str) -> String {
    let class = match verdict {
        Verdict::Real => "real",
        Verdict::Fake => "fake",
    };
    let body = format!(
        r#"        <h1>Result</h1>
        <p>The document <code>{filename}</code> was classified as</p>
        <p class="verdict {class}">{verdict}</p>
        <img class="preview" src="{src}" alt="{filename}">
        <p><a href="/upload">Upload another</a> or <a href="/view">view all submissions</a>.</p>"#,
        filename = escape_html(filename),
        class = class,
        verdict = verdict,
        src = escape_html(&upload_url(filename)),
    );
    layout("Result", &body)
}

/// All submissions in stored order, each with a delete button.
pub fn submissions(records: &[SubmissionRecord]) -> String {
    if records.is_empty() {
        return layout(
            "Submissions",
            r#"        <h1>Submissions</h1>
        <p>No documents have been submitted yet.</p>"#,
        );
    }

    let rows: String = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            format!(
                r#"            <tr>
                <td>{position}</td>
                <td>{name}</td>
                <td>{branch}</td>
                <td>{email}</td>
                <td>{subject}</td>
                <td><a href="{href}">{filename}</a></td>
                <td>{created}</td>
                <td>
                    <form method="post" action="/submissions/{id}/delete">
                        <button class="danger" type="submit">Delete</button>
                    </form>
                </td>
            </tr>
"#,
                position = index + 1,
                name = escape_html(&record.name),
                branch = escape_html(&record.branch),
                email = escape_html(&record.email),
                subject = escape_html(&record.subject),
                href = escape_html(&upload_url(&record.filename)),
                filename = escape_html(&record.filename),
                created = record.created_at.format("%Y-%m-%d %H:%M"),
                id = record.id,
            )
        })
        .collect();

    let body = format!(
        r#"        <h1>Submissions</h1>
        <table>
            <thead>
                <tr><th>#</th><th>Name</th><th>Branch</th><th>Email</th><th>Subject</th><th>File</th><th>Submitted</th><th></th></tr>
            </thead>
            <tbody>
{rows}            </tbody>
        </table>"#,
        rows = rows,
    );
    layout("Submissions", &body)
}

pub fn error_page(status: StatusCode, code: &str, message: &str, details: Option<&str>) -> String {
    let details = details
        .map(|d| format!("        <pre>{}</pre>\n", escape_html(d)))
        .unwrap_or_default();
    let body = format!(
        r#"        <h1>{status}</h1>
        <p class="notice">{message}</p>
        <p><small>{code}</small></p>
{details}        <p><a href="/">Back to home</a></p>"#,
        status = status,
        message = escape_html(message),
        code = escape_html(code),
        details = details,
    );
    layout(status.canonical_reason().unwrap_or("Error"), &body)
}

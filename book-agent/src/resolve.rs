use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::models::SearchOutcome;

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]\(([^)\s]+)\)").expect("Invalid regex"));

static PDF_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\s"'`()\[\]<>]+\.pdf\b"#).expect("Invalid regex"));

/// Pull a file path out of the search agent's answer.
///
/// The model is told to answer with the bare path, but sometimes wraps it in
/// backticks or quotes, a markdown link, or a sentence.
pub fn extract_file_path(output: &str) -> String {
    let trimmed = strip_wrapping(output.trim());

    if let Some(caps) = MARKDOWN_LINK.captures(trimmed) {
        return strip_wrapping(&caps[1]).to_string();
    }
    if trimmed.ends_with(".pdf") {
        return trimmed.to_string();
    }
    match PDF_TOKEN.find(trimmed) {
        Some(token) => token.as_str().to_string(),
        None => trimmed.to_string(),
    }
}

fn strip_wrapping(text: &str) -> &str {
    text.trim_matches(|c| matches!(c, '`' | '"' | '\'' | '<' | '>'))
        .trim()
}

/// A path is accepted only if it names an existing `.pdf` file inside the
/// download directory.
pub fn is_downloaded_pdf(path: &Path, download_dir: &Path) -> bool {
    if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("pdf") {
        return false;
    }
    match (path.canonicalize(), download_dir.canonicalize()) {
        (Ok(file), Ok(dir)) => file.starts_with(dir),
        _ => false,
    }
}

pub fn resolve_search_output(raw_output: &str, download_dir: &Path) -> SearchOutcome {
    let file_path = extract_file_path(raw_output);
    let candidate = PathBuf::from(&file_path);

    if is_downloaded_pdf(&candidate, download_dir) {
        SearchOutcome::Found(candidate)
    } else {
        SearchOutcome::NotFound {
            raw_output: raw_output.to_string(),
            file_path,
        }
    }
}

// src/report.rs
// =============================================================================
// Output of a finished crawl.
//
// - write_json(): pretty JSON file, one entry per query
// - to_json(): the same document as a string (for --json on stdout)
// - print_summary(): a human-readable table in the terminal
// =============================================================================

use anyhow::{Context, Result};
use std::path::Path;

use crate::crawl::QueryResult;

pub fn to_json(results: &[QueryResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context("Failed to serialize report")
}

pub fn write_json(results: &[QueryResult], path: &Path) -> Result<()> {
    let json = to_json(results)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}

// True if at least one page was loaded for at least one query
pub fn has_pages(results: &[QueryResult]) -> bool {
    results.iter().any(|r| !r.pages.is_empty())
}

pub fn print_summary(results: &[QueryResult]) {
    println!(
        "{:<30} {:>6} {:>6} {:>7} {:>9}",
        "QUERY", "SEEDS", "PAGES", "EMAILS", "TIME"
    );
    println!("{}", "=".repeat(62));

    for result in results {
        // Truncate long queries so the columns stay aligned
        let query = if result.query.chars().count() > 27 {
            format!("{}...", result.query.chars().take(27).collect::<String>())
        } else {
            result.query.clone()
        };

        println!(
            "{:<30} {:>6} {:>6} {:>7} {:>8.2}s",
            query,
            result.seed_urls.len(),
            result.pages.len(),
            result.emails.len(),
            result.elapsed_secs
        );
    }

    println!();

    for result in results.iter().filter(|r| !r.emails.is_empty()) {
        println!("📧 {}", result.query);
        for email in &result.emails {
            println!("   {}", email);
        }
    }

    let total_emails: usize = results.iter().map(|r| r.emails.len()).sum();
    let total_pages: usize = results.iter().map(|r| r.pages.len()).sum();

    println!("📊 Summary:");
    println!("   🔍 Queries: {}", results.len());
    println!("   📄 Pages: {}", total_pages);
    println!("   📧 Emails: {}", total_emails);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::PageRecord;

    fn sample() -> Vec<QueryResult> {
        vec![QueryResult {
            query: "acme corp".to_string(),
            seed_urls: vec!["https://acme.example/".to_string()],
            pages: vec![PageRecord {
                url: "https://acme.example/".to_string(),
                keywords: "anvils".to_string(),
                description: String::new(),
                emails: vec!["sales@acme.example".to_string()],
            }],
            emails: vec!["sales@acme.example".to_string()],
            elapsed_secs: 1.5,
        }]
    }

    #[test]
    fn test_json_shape() {
        let json = to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["query"], "acme corp");
        assert_eq!(value[0]["seed_urls"][0], "https://acme.example/");
        assert_eq!(value[0]["pages"][0]["keywords"], "anvils");
        assert_eq!(value[0]["emails"][0], "sales@acme.example");
        assert_eq!(value[0]["elapsed_secs"], 1.5);
    }

    #[test]
    fn test_write_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");

        write_json(&sample(), &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<QueryResult> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_has_pages() {
        assert!(has_pages(&sample()));
        let mut empty = sample();
        empty[0].pages.clear();
        assert!(!has_pages(&empty));
        assert!(!has_pages(&[]));
    }
}

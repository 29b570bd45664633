use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use tabstatus_core::config::Config;
use tabstatus_core::{RedactionTable, Sanitizer};

pub fn run(
    home: &Path,
    title: &str,
    url: &str,
    max_len: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(home).context("failed to load config")?;
    let max_len = max_len.unwrap_or(config.max_status_len);
    let sanitizer = Sanitizer::new(RedactionTable::with_extra(&config.redactions));
    let text = sanitizer.sanitize(title, url, max_len);

    if json {
        print_json(&serde_json::json!({
            "title": title,
            "url": url,
            "max_len": max_len,
            "status_text": text,
        }))?;
    } else {
        println!("{text}");
    }
    Ok(())
}

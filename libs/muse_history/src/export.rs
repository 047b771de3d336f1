use std::fmt::Write;

use crate::error::HistoryError;
use crate::model::GenerationRecord;

const REPORT_TITLE: &str = "Muse Content Generator - Content History";

/// Encodes records exactly as the history file stores them, so the output can be loaded back.
pub fn to_json(records: &[GenerationRecord]) -> Result<Vec<u8>, HistoryError> {
    let mut bytes = serde_json::to_vec_pretty(records)?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn text_report(records: &[GenerationRecord]) -> String {
    let mut report = format!("{}\n{}\n\n", REPORT_TITLE, "=".repeat(50));
    for record in records {
        report.push_str(&record_block(record));
    }
    report
}

fn record_block(record: &GenerationRecord) -> String {
    let mut block = String::new();
    let tags = if record.tags.is_empty() {
        "None".to_string()
    } else {
        record.tags.iter().cloned().collect::<Vec<_>>().join(", ")
    };

    // Writing into a String cannot fail.
    let _ = writeln!(block, "ID: {}", record.id);
    let _ = writeln!(block, "Keyword: {}", record.keyword);
    let _ = writeln!(block, "Type: {}", record.content_type.label());
    let _ = writeln!(block, "Language: {}", record.language.label());
    let _ = writeln!(
        block,
        "Tone: {}",
        record.tone.map_or("N/A", |tone| tone.label())
    );
    let _ = writeln!(
        block,
        "Audience: {}",
        record.audience.map_or("N/A", |audience| audience.label())
    );
    let _ = writeln!(
        block,
        "Rhyme Scheme: {}",
        record.rhyme_scheme.map_or("N/A", |scheme| scheme.label())
    );
    let _ = writeln!(block, "Length: {} words", record.length_words);
    let _ = writeln!(block, "Date: {}", record.created_at.to_rfc3339());
    let _ = writeln!(
        block,
        "Favorite: {}",
        if record.favorite { "Yes" } else { "No" }
    );
    let _ = writeln!(block, "Tags: {}", tags);
    let _ = writeln!(block, "Content:\n{}", record.text);
    let _ = writeln!(block, "{}\n", "-".repeat(30));
    block
}

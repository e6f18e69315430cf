use serde_json::json;
use xlfedit::{EditorState, Stats};

fn completion_percent(stats: &Stats) -> f64 {
    if stats.total == 0 {
        100.0
    } else {
        (stats.translated as f64) * 100.0 / (stats.total as f64)
    }
}

pub fn print_stats(state: &EditorState, json_output: bool) -> Result<(), String> {
    let stats = state.stats();
    let percent = completion_percent(&stats);

    if json_output {
        let body = json!({
            "file": state.file_name(),
            "format": state.document_format(),
            "target_lang": state.target_lang(),
            "total": stats.total,
            "translated": stats.translated,
            "missing": stats.missing,
            "changed": stats.changed,
            "completion_percent": (percent * 100.0).round() / 100.0,
        });
        let text = serde_json::to_string_pretty(&body).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    println!("=== Stats ===");
    println!("File: {}", state.file_name().unwrap_or("-"));
    println!("Format: {}", state.document_format().unwrap_or_default());
    if let Some(lang) = state.target_lang() {
        println!("Target language: {}", lang);
    }
    println!("  Total: {}", stats.total);
    println!("  Translated: {}", stats.translated);
    println!("  Missing: {}", stats.missing);
    println!("  Completion: {:.2}%", percent);
    Ok(())
}

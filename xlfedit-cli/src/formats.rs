use serde_json::json;
use xlfedit::EditorState;

/// Print what was detected for a loaded document and what it can be exported to.
pub fn print_formats(state: &EditorState, json_output: bool) -> Result<(), String> {
    let features = state.features().map_err(|e| e.to_string())?;
    let exports = state
        .supported_export_formats()
        .map_err(|e| e.to_string())?;
    let dialect = state.dialect().map(|d| d.to_string()).unwrap_or_default();
    let source_tag = state.source_language_identifier().map(|l| l.to_string());
    let target_tag = state.target_language_identifier().map(|l| l.to_string());
    if state.target_lang().is_some() && target_tag.is_none() {
        tracing::warn!(
            event = "invalid_language_tag",
            lang = state.target_lang().unwrap_or_default(),
            "target language is not a valid language identifier"
        );
    }

    if json_output {
        let formats: Vec<_> = exports
            .iter()
            .map(|f| {
                json!({
                    "format": f.to_string(),
                    "label": f.label(),
                    "extension": f.extension(),
                    "mime_type": f.mime_type(),
                })
            })
            .collect();
        let body = json!({
            "dialect": dialect,
            "document_format": state.document_format(),
            "source_lang": state.source_lang(),
            "target_lang": state.target_lang(),
            "source_language_tag": source_tag,
            "target_language_tag": target_tag,
            "features": features,
            "exports": formats,
        });
        let text = serde_json::to_string_pretty(&body).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    println!("Dialect: {}", dialect);
    println!(
        "Document format: {}",
        state.document_format().unwrap_or_default()
    );
    println!(
        "Languages: {} -> {}",
        source_tag.as_deref().unwrap_or("?"),
        target_tag.as_deref().unwrap_or("?")
    );
    println!("Has source text: {}", features.has_source);
    println!("Has notes: {}", features.has_notes);
    println!("Exports:");
    for format in &exports {
        println!(
            "  {} ({}, .{}, {})",
            format.label(),
            format,
            format.extension(),
            format.mime_type()
        );
    }
    Ok(())
}

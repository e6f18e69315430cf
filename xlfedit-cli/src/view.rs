use serde_json::json;
use xlfedit::{EditorState, FilterStatus, TranslationUnit};

const PREVIEW_CHARS: usize = 50;

/// Options for `xlfedit view`.
pub struct ViewOptions {
    pub status: FilterStatus,
    pub query: Option<String>,
    /// Zero-based page, `None` shows every match.
    pub page: Option<usize>,
    pub page_size: usize,
    pub full: bool,
    pub json: bool,
}

fn truncate(value: &str, full: bool) -> String {
    if full || value.chars().count() <= PREVIEW_CHARS {
        value.to_string()
    } else {
        let head: String = value.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    }
}

/// Print the units of a loaded document that pass the filters.
pub fn print_view(state: &mut EditorState, options: &ViewOptions) -> Result<(), String> {
    state.set_filter_status(options.status);
    state.set_filter_query(options.query.clone().unwrap_or_default());
    let features = state.features().map_err(|e| e.to_string())?;

    let matched = state.filtered_units().len();
    let units: Vec<&TranslationUnit> = match options.page {
        Some(index) => state.page(index, options.page_size),
        None => state.filtered_units(),
    };

    if options.json {
        let body = json!({
            "file": state.file_name(),
            "format": state.document_format(),
            "source_lang": state.source_lang(),
            "target_lang": state.target_lang(),
            "total": state.units().len(),
            "matched": matched,
            "page": options.page.map(|p| p + 1),
            "units": units,
        });
        let text = serde_json::to_string_pretty(&body).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    println!(
        "=== {} ({}) ===",
        state.file_name().unwrap_or("-"),
        state.document_format().unwrap_or_default()
    );
    println!(
        "Languages: {} -> {}",
        state.source_lang().unwrap_or("?"),
        state.target_lang().unwrap_or("?")
    );
    match options.page {
        Some(index) => println!(
            "Matched: {} of {} (page {}/{})",
            matched,
            state.units().len(),
            index + 1,
            state.page_count(options.page_size).max(1)
        ),
        None => println!("Matched: {} of {}", matched, state.units().len()),
    }

    if units.is_empty() {
        eprintln!("No units match the current filter");
        return Ok(());
    }

    for unit in units {
        let status = if unit.is_translated() {
            "translated"
        } else {
            "missing"
        };
        println!("\n  {} [{}]", unit.id, status);
        if let Some(state) = &unit.state {
            println!("    State: {}", state);
        }
        if features.has_source {
            println!("    Source: {}", truncate(&unit.source, options.full));
        }
        println!("    Target: {}", truncate(&unit.target, options.full));
        if features.has_notes {
            let notes = unit.notes_summary();
            if !notes.is_empty() {
                println!("    Notes: {}", truncate(&notes, options.full));
            }
            let locations = unit.location_references();
            if !locations.is_empty() {
                println!("    Locations: {}", locations.join(", "));
            }
        }
    }
    Ok(())
}

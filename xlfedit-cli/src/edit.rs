use std::fs;

use xlfedit::UpdateOutcome;
use xlfedit_cli::load_state;

/// Sets the target of `key` and writes the document back in its own format.
///
/// Without `output` the input file is overwritten.
pub fn run_edit_set_command(
    input: String,
    key: String,
    value: String,
    output: Option<String>,
) -> Result<(), String> {
    let mut state = load_state(&input)?;

    match state.update_unit(&key, &value).map_err(|e| e.to_string())? {
        UpdateOutcome::Applied => {}
        UpdateOutcome::UnitNotFound => {
            return Err(format!("Key '{}' not found in {}", key, input));
        }
        UpdateOutcome::MissingAnchor => {
            return Err(format!(
                "Key '{}' has no place for a target in {}; nothing was written",
                key, input
            ));
        }
    }

    let content = state.serialize().map_err(|e| e.to_string())?;
    let out = output.unwrap_or(input);
    fs::write(&out, content).map_err(|e| format!("Error writing output: {}", e))?;
    tracing::info!(event = "edit_written", key = %key, output = %out);
    println!("✅ Updated '{}' in {}", key, out);
    Ok(())
}

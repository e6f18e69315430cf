use std::{fs, path::PathBuf};

use xlfedit::ExportOptions;
use xlfedit_cli::{load_state, parse_export_target};

/// Options for `xlfedit export`.
pub struct ExportArgs {
    pub input: String,
    pub format: String,
    pub output: Option<String>,
    pub out_dir: Option<String>,
    pub base_name: Option<String>,
    pub no_locale_suffix: bool,
}

pub fn run_export_command(args: ExportArgs) -> Result<(), String> {
    let target = parse_export_target(&args.format)?;
    let state = load_state(&args.input)?;
    let content = state
        .export_content(target.kind, target.shape)
        .map_err(|e| e.to_string())?;

    let destination = match args.output {
        Some(output) => PathBuf::from(output),
        None => {
            let options = ExportOptions::new()
                .with_base_name(args.base_name)
                .with_locale_suffix(!args.no_locale_suffix);
            let file_name = state.export_file_name(target.format(), &options);
            let dir = match args.out_dir {
                Some(dir) => PathBuf::from(dir),
                None => PathBuf::from(&args.input)
                    .parent()
                    .map(PathBuf::from)
                    .unwrap_or_default(),
            };
            dir.join(file_name)
        }
    };

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Error creating {}: {}", parent.display(), e))?;
    }
    fs::write(&destination, content).map_err(|e| format!("Error writing output: {}", e))?;
    println!("✅ Exported {} to {}", target.format().label(), destination.display());
    Ok(())
}

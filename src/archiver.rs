use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::RunReport;
use crate::tree::{self, Node};

pub fn load_tree(path: &Path) -> Result<Node> {
    let text = fs::read_to_string(path)?;
    let raw: serde_json::Value = serde_json::from_str(&text)?;
    Ok(tree::build(&raw)?)
}

/// Writes the report pretty-printed. The file appears in one step: the JSON
/// goes to a sibling temp file that is then renamed over `path`.
pub fn save_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    let tmp = temp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

pub fn load_report(path: &Path) -> Result<RunReport> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

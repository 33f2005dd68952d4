use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use trend_core::{export_rows, NormalizedRecord};

use crate::config::ExportFormat;
use crate::processing::{AnalysisRequest, AnalysisRun};

/// `youtube_{language}_{video_type}_{sub_category}_analysis`, lower-cased,
/// spaces replaced by underscores
pub fn export_file_stem(request: &AnalysisRequest) -> String {
    format!(
        "youtube_{}_{}_{}_analysis",
        request.language,
        request.video_type.label(),
        request.sub_category
    )
    .to_lowercase()
    .replace(' ', "_")
}

/// Write the export rows as CSV with a header line
pub fn write_csv<P: AsRef<Path>>(path: P, records: &[NormalizedRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    for row in export_rows(records) {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the whole run (request, records, summary, anomalies) as pretty JSON
pub fn write_json<P: AsRef<Path>>(path: P, run: &AnalysisRun) -> Result<()> {
    let path = path.as_ref();
    let json_data = serde_json::to_string_pretty(run)?;
    std::fs::write(path, json_data).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Write every requested format into `dir`, returning the files written
pub fn export_run<P: AsRef<Path>>(
    run: &AnalysisRun,
    dir: P,
    formats: &[ExportFormat],
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let stem = export_file_stem(&run.request);
    let mut written = Vec::new();

    for format in formats {
        let path = match format {
            ExportFormat::CSV => {
                let path = dir.join(format!("{}.csv", stem));
                write_csv(&path, &run.records)?;
                path
            }
            ExportFormat::JSON => {
                let path = dir.join(format!("{}.json", stem));
                write_json(&path, run)?;
                path
            }
        };
        info!("💾 Results saved to: {}", path.display());
        written.push(path);
    }

    Ok(written)
}

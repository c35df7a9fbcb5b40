use serde::Serialize;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::{AppError, AppResult, SinkError};
use crate::vitals::VitalsReport;

/// Path value that sends the export to stdout.
pub(crate) const STDOUT_PATH: &str = "-";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'report> {
    generated_at: String,
    summary: &'report crate::vitals::VitalsSummary,
    snapshot: &'report crate::vitals::VitalsSnapshot,
}

pub(crate) fn render_export(report: &VitalsReport) -> AppResult<Vec<u8>> {
    let document = ExportDocument {
        generated_at: chrono::Utc::now().to_rfc3339(),
        summary: &report.summary,
        snapshot: &report.snapshot,
    };
    serde_json::to_vec_pretty(&document)
        .map_err(|err| AppError::sink(SinkError::SerializeExport { source: err }))
}

pub(crate) async fn export_json(path: &str, report: &VitalsReport) -> AppResult<()> {
    let mut json = render_export(report)?;
    json.push(b'\n');

    if path == STDOUT_PATH {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(&json).await?;
        stdout.flush().await?;
        return Ok(());
    }

    let write_error = |err| {
        AppError::sink(SinkError::WriteExport {
            path: path.to_owned(),
            source: err,
        })
    };
    let file = tokio::fs::File::create(path).await.map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&json).await.map_err(write_error)?;
    writer.flush().await.map_err(write_error)?;
    tracing::debug!("Exported report to {}", path);
    Ok(())
}

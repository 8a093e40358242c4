use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use snaptext_types::RecognitionOutcome;

/// Where a capture is persisted for the engine. The sequence number rides in
/// the file name so the echoed path correlates the asynchronous result.
pub fn task_path(temp_dir: &Path, seq: u64) -> PathBuf {
    temp_dir.join(format!("capture-{seq:06}.png"))
}

pub fn request_line(path: &Path) -> String {
    serde_json::json!({ "image_path": path.display().to_string() }).to_string()
}

pub fn sequence_from_path(path: &str) -> Option<u64> {
    let stem = Path::new(path).file_stem()?.to_str()?;
    stem.strip_prefix("capture-")?.parse().ok()
}

#[derive(Debug)]
pub struct EngineResponse {
    pub image_path: String,
    pub outcome: RecognitionOutcome,
}

/// One stdout line from the engine. Lines that are not JSON objects echoing
/// `image_path` are engine chatter (startup banners, progress) and yield
/// `None`; everything else produces exactly one outcome.
pub fn parse_response(line: &str) -> Option<EngineResponse> {
    let value: Value = serde_json::from_str(line).ok()?;
    let image_path = value.get("image_path")?.as_str()?.to_string();

    Some(EngineResponse {
        image_path,
        outcome: normalize_result(&value),
    })
}

/// The engine has shipped two response shapes over time; the block collection
/// may sit under `ocrResult` or `ocr_response`. Blocks without a `text` string
/// are skipped; surviving lines are newline-joined and classified.
pub fn normalize_result(result: &Value) -> RecognitionOutcome {
    match extract_lines(result) {
        Ok(lines) if lines.is_empty() => RecognitionOutcome::NoText,
        Ok(lines) => snaptext_core::text::classify(&lines.join("\n")),
        Err(e) => RecognitionOutcome::Failed(format!("engine response parse error: {e}")),
    }
}

fn extract_lines(result: &Value) -> Result<Vec<String>> {
    let blocks = match result
        .get("ocrResult")
        .or_else(|| result.get("ocr_response"))
    {
        Some(blocks) => blocks,
        None => return Ok(Vec::new()),
    };

    let blocks = blocks.as_array().context("block collection is not an array")?;

    Ok(blocks
        .iter()
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .map(str::to_string)
        .collect())
}

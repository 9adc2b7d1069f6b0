use std::process::Stdio;

use async_trait::async_trait;
use image::ImageFormat;
use tempfile::NamedTempFile;
use tokio::process::Command;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Recognizes text in an uploaded image.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> AppResult<String>;
}

/// OCR through the `tesseract` command line tool.
pub struct TesseractOcr {
    binary: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(binary: &str, language: &str) -> Self {
        Self {
            binary: binary.to_string(),
            language: language.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.tesseract_path, &config.ocr_language)
    }

    async fn ensure_available(&self) -> AppResult<()> {
        let status = Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| AppError::OcrUnavailable(format!("{}: {}", self.binary, e)))?;

        if !status.success() {
            return Err(AppError::OcrUnavailable(format!(
                "{} --version exited with {}",
                self.binary, status
            )));
        }
        Ok(())
    }
}

/// Decodes the upload, converts it to grayscale and writes it to a temporary
/// PNG. The file is removed when the returned handle is dropped.
pub(crate) fn prepare_image(bytes: &[u8]) -> AppResult<NamedTempFile> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| AppError::ExtractionFailed(format!("unreadable image: {}", e)))?;

    let mut file = tempfile::Builder::new()
        .prefix("quizcraft-ocr-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| AppError::InternalError(format!("failed to create temp file: {}", e)))?;

    image
        .grayscale()
        .write_to(&mut file, ImageFormat::Png)
        .map_err(|e| AppError::InternalError(format!("failed to write temp image: {}", e)))?;

    Ok(file)
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: &[u8]) -> AppResult<String> {
        self.ensure_available().await?;

        let bytes = image.to_vec();
        let temp = tokio::task::spawn_blocking(move || prepare_image(&bytes))
            .await
            .map_err(|e| AppError::InternalError(format!("image preparation aborted: {}", e)))??;

        let output = Command::new(&self.binary)
            .arg(temp.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .await
            .map_err(|e| AppError::OcrUnavailable(format!("{}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::ExtractionFailed(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.lines().next().unwrap_or_default()
            )));
        }

        log::debug!("OCR produced {} bytes of text", output.stdout.len());
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

//! Per-file and per-run drivers.
//!
//! Read → segment → (chunk → translate)* → reassemble → write, stopping at the
//! first error. A destination file is written once, after every chunk of its
//! source has been translated.

use crate::chunk::chunk_text;
use crate::config::Config;
use crate::discovery::discover_markdown_files;
use crate::error::{PipelineError, TranslateError};
use crate::segment::{segment, SpanKind};
use crate::translator::Translator;
use crate::validator::TranslationValidator;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Counts for one translated file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileReport {
    pub kept_spans: usize,
    pub translated_spans: usize,
    pub chunks: usize,
    pub chars_sent: usize,
}

/// Counts for a whole shard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub files: usize,
    pub chunks: usize,
    pub chars_sent: usize,
}

impl RunReport {
    fn add(&mut self, file: &FileReport) {
        self.files += 1;
        self.chunks += file.chunks;
        self.chars_sent += file.chars_sent;
    }
}

/// Translate `text`, passing protected spans through unchanged.
pub async fn translate_text<T: Translator + ?Sized>(
    translator: &T,
    text: &str,
    max_chars: usize,
) -> Result<(String, FileReport), TranslateError> {
    let mut report = FileReport::default();
    let mut output = String::with_capacity(text.len());

    for span in segment(text) {
        let span_text = span.text(text);
        match span.kind {
            SpanKind::Keep => {
                report.kept_spans += 1;
                output.push_str(span_text);
            }
            SpanKind::Translate => {
                report.translated_spans += 1;
                let chunks = chunk_text(span_text, max_chars);
                let total = chunks.len();

                for (idx, chunk) in chunks.into_iter().enumerate() {
                    let chars = chunk.chars().count();
                    info!("Translating chunk {}/{} ({} chars)", idx + 1, total, chars);

                    let translated = translator.translate(chunk).await?;

                    let validation = TranslationValidator::validate(chunk, &translated);
                    if !validation.is_clean() {
                        warn!(
                            "Translation validation warnings from {}: {:?}",
                            translator.name(),
                            validation.warnings
                        );
                    }

                    output.push_str(&translated);
                    report.chunks += 1;
                    report.chars_sent += chars;
                }
            }
        }
    }

    Ok((output, report))
}

/// Translate one file from `src` into `dst`, creating parent directories.
pub async fn translate_file<T: Translator + ?Sized>(
    translator: &T,
    src: &Path,
    dst: &Path,
    max_chars: usize,
) -> Result<FileReport, PipelineError> {
    info!("Processing file {}", src.display());

    let content = tokio::fs::read_to_string(src)
        .await
        .map_err(|source| PipelineError::Read {
            path: src.to_path_buf(),
            source,
        })?;

    let (output, report) = translate_text(translator, &content, max_chars)
        .await
        .map_err(|source| PipelineError::Translate {
            path: src.to_path_buf(),
            source,
        })?;

    let write_err = |source: std::io::Error| PipelineError::Write {
        path: dst.to_path_buf(),
        source,
    };
    if let Some(parent) = dst.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    tokio::fs::write(dst, output).await.map_err(write_err)?;

    info!("Wrote translated file to {}", dst.display());
    Ok(report)
}

/// Destination for `src`: its path relative to `docs_dir`, rebased onto `out_dir`.
pub fn output_path(docs_dir: &Path, out_dir: &Path, src: &Path) -> PathBuf {
    match src.strip_prefix(docs_dir) {
        Ok(rel) => out_dir.join(rel),
        // Discovery only yields paths under docs_dir
        Err(_) => out_dir.join(src.file_name().unwrap_or(src.as_os_str())),
    }
}

/// Translate every file assigned to this process's shard.
pub async fn run<T: Translator + ?Sized>(
    config: &Config,
    translator: &T,
) -> Result<RunReport, PipelineError> {
    let root = config.docs_dir.clone();
    let files = tokio::task::spawn_blocking(move || discover_markdown_files(&root))
        .await
        .map_err(std::io::Error::other)
        .and_then(|walked| walked)
        .map_err(|source| PipelineError::Discover {
            path: config.docs_dir.clone(),
            source,
        })?;

    let targets = config.shard.select(&files);
    info!(
        "Shard {}/{}: {} of {} files",
        config.shard.index(),
        config.shard.total(),
        targets.len(),
        files.len()
    );

    let mut report = RunReport::default();
    if targets.is_empty() {
        info!("No files assigned to this shard.");
        return Ok(report);
    }

    for src in &targets {
        let dst = output_path(&config.docs_dir, &config.out_dir, src);
        info!("Translating {} -> {}", src.display(), dst.display());
        let file_report = translate_file(translator, src, &dst, config.max_chars).await?;
        report.add(&file_report);
    }

    Ok(report)
}

//! File processing API for calculator programs
//!
//! Extracts one stage of the pipeline (`token` or `tree`) from a source and
//! renders it in the requested format. Format strings have the shape
//! `<stage>-<format>`, e.g. `tree-sexpr` or `token-json`.

use crate::calc::diagnostics::{TraceLog, TraceSink};
use crate::calc::lexer::{tokenize, Lexer, Token, TokenKind};
use crate::calc::parser::parse_tokens;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Represents the processing stage (what data to extract)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Token,
    Tree,
}

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Sexpr,
    Yaml,
}

/// A stage and format pair, written `<stage>-<format>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingSpec {
    /// Parse a format string like "tree-sexpr" or "token-simple"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let (stage, format) = format_str
            .split_once('-')
            .ok_or_else(|| ProcessingError::InvalidFormat(format_str.to_string()))?;

        let stage = match stage {
            "token" => ProcessingStage::Token,
            "tree" => ProcessingStage::Tree,
            other => return Err(ProcessingError::InvalidStage(other.to_string())),
        };

        let format = match format {
            "simple" => OutputFormat::Simple,
            "json" => OutputFormat::Json,
            "sexpr" => OutputFormat::Sexpr,
            "yaml" => OutputFormat::Yaml,
            other => return Err(ProcessingError::InvalidFormatType(other.to_string())),
        };

        let spec = ProcessingSpec { stage, format };
        if !Self::available_specs().contains(&spec) {
            return Err(ProcessingError::InvalidFormatType(format!(
                "'{}' is not supported for the {} stage",
                spec.format_name(),
                spec.stage_name()
            )));
        }
        Ok(spec)
    }

    /// Every supported stage and format pair
    pub fn available_specs() -> Vec<ProcessingSpec> {
        use OutputFormat::*;
        use ProcessingStage::*;
        vec![
            ProcessingSpec {
                stage: Token,
                format: Simple,
            },
            ProcessingSpec {
                stage: Token,
                format: Json,
            },
            ProcessingSpec {
                stage: Tree,
                format: Sexpr,
            },
            ProcessingSpec {
                stage: Tree,
                format: Json,
            },
            ProcessingSpec {
                stage: Tree,
                format: Yaml,
            },
        ]
    }

    fn stage_name(&self) -> &'static str {
        match self.stage {
            ProcessingStage::Token => "token",
            ProcessingStage::Tree => "tree",
        }
    }

    fn format_name(&self) -> &'static str {
        match self.format {
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
            OutputFormat::Sexpr => "sexpr",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl std::fmt::Display for ProcessingSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.stage_name(), self.format_name())
    }
}

/// Errors that can occur during processing
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid format: {0} (expected <stage>-<format>)")]
    InvalidFormat(String),
    #[error("invalid stage: {0}")]
    InvalidStage(String),
    #[error("invalid format type: {0}")]
    InvalidFormatType(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// What one processing run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedOutput {
    /// Trace channel lines; empty for the token stage or when streamed to a sink
    pub trace: Vec<String>,
    /// The rendered stage output
    pub output: String,
    /// Syntax errors reported while parsing
    pub error_count: usize,
}

/// Process source text according to the given stage and format
pub fn process_source(
    source: &str,
    spec: &ProcessingSpec,
) -> Result<ProcessedOutput, ProcessingError> {
    let (mut processed, log) = process_source_with(source, spec, TraceLog::new())?;
    processed.trace = log.lines();
    Ok(processed)
}

/// Like [`process_source`], but trace events go to `sink` as the parser emits
/// them and the returned `trace` is left empty.
pub fn process_source_with<K: TraceSink>(
    source: &str,
    spec: &ProcessingSpec,
    sink: K,
) -> Result<(ProcessedOutput, K), ProcessingError> {
    match spec.stage {
        ProcessingStage::Token => {
            let tokens = tokenize(source);
            let output = format_tokens(&tokens, spec.format)?;
            let processed = ProcessedOutput {
                trace: Vec::new(),
                output,
                error_count: 0,
            };
            Ok((processed, sink))
        }
        ProcessingStage::Tree => {
            let (outcome, sink) = parse_tokens(Lexer::new(source), sink);
            let output = match spec.format {
                OutputFormat::Sexpr => outcome.to_sexpr(),
                OutputFormat::Json => serde_json::to_string_pretty(&outcome)
                    .map_err(|e| ProcessingError::Serialization(e.to_string()))?,
                OutputFormat::Yaml => serde_yaml::to_string(&outcome)
                    .map_err(|e| ProcessingError::Serialization(e.to_string()))?,
                OutputFormat::Simple => {
                    return Err(ProcessingError::InvalidFormatType(
                        "simple format only works with the token stage".to_string(),
                    ))
                }
            };
            let processed = ProcessedOutput {
                trace: Vec::new(),
                output,
                error_count: outcome.error_count(),
            };
            Ok((processed, sink))
        }
    }
}

/// Process a calculator file according to the given stage and format
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
) -> Result<ProcessedOutput, ProcessingError> {
    let file_path = file_path.as_ref();
    let content = fs::read_to_string(file_path).map_err(|source| ProcessingError::Io {
        path: file_path.display().to_string(),
        source,
    })?;
    process_source(&content, spec)
}

/// Format tokens according to the specified format
fn format_tokens(tokens: &[Token], format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Simple => {
            let mut result = String::new();
            for token in tokens {
                result.push_str(&token.to_string());
                if token.kind != TokenKind::Eof {
                    result.push('\n');
                }
            }
            Ok(result)
        }
        OutputFormat::Json => serde_json::to_string_pretty(tokens)
            .map_err(|e| ProcessingError::Serialization(e.to_string())),
        OutputFormat::Sexpr | OutputFormat::Yaml => Err(ProcessingError::InvalidFormatType(
            "sexpr and yaml formats only work with the tree stage".to_string(),
        )),
    }
}

/// Get all available format strings
pub fn available_formats() -> Vec<String> {
    ProcessingSpec::available_specs()
        .iter()
        .map(ToString::to_string)
        .collect()
}

use std::path::Path;

use openmock_core::Contract;
use serde_json::Value;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::category::infer_category;
use crate::errors::{ParseError, Result};
use crate::options::ParseOptions;
use crate::source::DocumentFormat;

pub mod mapper;

/// Parser for OpenAPI 3.x contract documents.
#[derive(Debug, Clone, Default)]
pub struct ContractParser {
    options: ParseOptions,
}

impl ContractParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a single document, logging and swallowing any failure.
    pub fn parse_file(&self, path: &Path) -> Option<Contract> {
        match self.try_parse_file(path) {
            Ok(contract) => Some(contract),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unparseable contract");
                None
            }
        }
    }

    /// Parse a single document, returning the failure cause.
    pub fn try_parse_file(&self, path: &Path) -> Result<Contract> {
        let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_str(&content, DocumentFormat::from_path(path), path)
    }

    /// Parse an in-memory document; `origin` provides the fallback name and
    /// participates in category inference.
    pub fn parse_str(
        &self,
        content: &str,
        format: DocumentFormat,
        origin: &Path,
    ) -> Result<Contract> {
        let document = format.decode(content)?;
        self.map_document(&document, origin)
    }

    /// Recursively parse every contract under `root`. Unreadable documents
    /// are logged and skipped.
    pub fn parse_directory(&self, root: &Path) -> Vec<Contract> {
        let mut contracts = Vec::new();
        let mut skipped = 0_usize;

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_skipped_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(root = %root.display(), error = %err, "directory walk error");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.is_contract_file(entry.path()) {
                continue;
            }

            match self.parse_file(entry.path()) {
                Some(contract) => {
                    debug!(
                        path = %entry.path().display(),
                        contract = %contract.name,
                        category = %contract.category,
                        "contract parsed"
                    );
                    contracts.push(contract);
                }
                None => skipped += 1,
            }
        }

        info!(
            root = %root.display(),
            contracts = contracts.len(),
            skipped,
            "contract scan finished"
        );
        contracts
    }

    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.options.skips_dir(name))
    }

    fn is_contract_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.options.accepts_extension(ext))
    }

    fn map_document(&self, document: &Value, origin: &Path) -> Result<Contract> {
        if !document.is_object() {
            return Err(ParseError::InvalidDocument(format!(
                "{}: top-level value must be a mapping",
                origin.display()
            )));
        }

        let info = document.get("info");
        let name = info
            .and_then(|info| info.get("title"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| file_stem(origin));
        let version = info
            .and_then(|info| info.get("version"))
            .and_then(scalar_to_string);
        let description = info
            .and_then(|info| info.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let base_path = document
            .get("servers")
            .and_then(Value::as_array)
            .and_then(|servers| servers.first())
            .and_then(|server| server.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let origin_str = origin.to_string_lossy();
        let category = infer_category(&self.options.categories, &origin_str, &name);

        let schemas = mapper::map_schemas(
            document
                .get("components")
                .and_then(|components| components.get("schemas")),
        );
        let endpoints = mapper::map_endpoints(document.get("paths"));

        Ok(Contract {
            name,
            version,
            description,
            base_path,
            endpoints,
            schemas,
            file_path: Some(origin_str.into_owned()),
            category,
        })
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// YAML authors often write `version: 1.0`; keep it as text.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

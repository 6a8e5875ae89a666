use cellcast_common::{Fields, Key, Location, Value};
use cellcast_workbook::{Sheet, Workbook};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::builder::RecordBuilder;
use crate::config::ExportConfig;
use crate::constraint::{self, Constraint};
use crate::emit;
use crate::error::ExportError;
use crate::extract::{
    Extracted, SheetAnnotation, SheetContext, SignFilter, detect_config_columns,
    extract_config_sheet, extract_item_sheet, parse_sheet_name,
};
use crate::record::Record;

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    pub manifest: Option<PathBuf>,
}

/// One export run: extraction of every input, then constraint validation,
/// then output.
pub struct Exporter {
    config: ExportConfig,
    signs: SignFilter,
    records: Vec<Record>,
    constraints: Vec<Constraint>,
    seen_paths: HashSet<PathBuf>,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        let signs = SignFilter::from_option(config.sign.as_deref());
        Self {
            config,
            signs,
            records: Vec::new(),
            constraints: Vec::new(),
            seen_paths: HashSet::new(),
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Extract every configured input, validate, and write outputs.
    pub fn run(&mut self) -> Result<ExportSummary, ExportError> {
        let inputs = self.config.inputs.clone();
        for path in &inputs {
            self.add_path(path)?;
        }
        self.validate()?;
        self.write_outputs()
    }

    pub fn add_path(&mut self, path: &Path) -> Result<(), ExportError> {
        self.mark_seen(path)?;
        let book = Workbook::open(path)?;
        self.extract_workbook(&book)
    }

    /// Extract an already opened workbook.
    pub fn add_workbook(&mut self, book: &Workbook) -> Result<(), ExportError> {
        self.mark_seen(book.path())?;
        self.extract_workbook(book)
    }

    fn mark_seen(&mut self, path: &Path) -> Result<(), ExportError> {
        if !self.seen_paths.insert(path.to_path_buf()) {
            return Err(ExportError::DuplicatePath(path.to_path_buf()));
        }
        Ok(())
    }

    fn extract_workbook(&mut self, book: &Workbook) -> Result<(), ExportError> {
        // index of the record collecting an open `<<` group
        let mut group: Option<usize> = None;

        for sheet in book.sheets() {
            let Some(annotation) = parse_sheet_name(sheet.name()) else {
                debug!(sheet = sheet.name(), "no export mark, skipping");
                continue;
            };

            match group {
                None => {
                    let index = self.export_sheet(book.path(), sheet, &annotation)?;
                    if annotation.opens_group {
                        group = Some(index);
                    }
                }
                Some(index) => self.merge_into_group(index, book.path(), sheet, &annotation)?,
            }

            if annotation.closes_group {
                group = None;
            }
        }
        Ok(())
    }

    fn extract(
        &mut self,
        path: &Path,
        sheet: &Sheet,
        annotation: &SheetAnnotation,
    ) -> Result<(Extracted, bool), ExportError> {
        let ctx = SheetContext {
            sheet,
            location: Location::new(path, sheet.name()),
            signs: &self.signs,
            with_schema: self.config.manifest.is_some(),
        };
        let mut builder = RecordBuilder::new(&mut self.constraints);
        match detect_config_columns(sheet) {
            Some(columns) => Ok((extract_config_sheet(&ctx, &mut builder, columns)?, false)),
            None => Ok((
                extract_item_sheet(&ctx, &mut builder, annotation.map_level)?,
                true,
            )),
        }
    }

    /// Start a new record for `sheet`; returns its index.
    fn export_sheet(
        &mut self,
        path: &Path,
        sheet: &Sheet,
        annotation: &SheetAnnotation,
    ) -> Result<usize, ExportError> {
        let mark = &annotation.mark;
        let is_item = detect_config_columns(sheet).is_none();
        let suffix = self.config.suffix();
        let (root, item) = if is_item && !annotation.opens_group {
            (format!("{mark}s{suffix}"), Some(mark.clone()))
        } else {
            (format!("{mark}{suffix}"), None)
        };

        if let Some(previous) = self.records.iter().find(|r| r.root == root) {
            return Err(ExportError::DuplicateRoot {
                root,
                path: path.to_path_buf(),
                previous: previous.path.clone(),
            });
        }

        let (extracted, is_item) = self.extract(path, sheet, annotation)?;
        let (schema, data) = if is_item && annotation.opens_group {
            let mut schema = Fields::new();
            let mut data = Fields::new();
            collect_items(&mut schema, &mut data, mark, extracted);
            (Value::Object(schema), Value::Object(data))
        } else {
            (Value::Object(extracted.schema), extracted.data)
        };

        info!(sheet = sheet.name(), root = %root, "extracted sheet");
        self.records.push(Record {
            path: path.to_path_buf(),
            sheet: sheet.name().to_string(),
            export_file: self.config.export_file(&root),
            root,
            item,
            export_mark: mark.clone(),
            schema,
            data,
        });
        Ok(self.records.len() - 1)
    }

    fn merge_into_group(
        &mut self,
        index: usize,
        path: &Path,
        sheet: &Sheet,
        annotation: &SheetAnnotation,
    ) -> Result<(), ExportError> {
        let (extracted, is_item) = self.extract(path, sheet, annotation)?;
        let record = &mut self.records[index];
        let (Value::Object(schema), Value::Object(data)) = (&mut record.schema, &mut record.data)
        else {
            return Err(ExportError::Config(format!(
                "group `{}` cannot hold sheet `{}`",
                record.root,
                sheet.name()
            )));
        };

        if is_item {
            collect_items(schema, data, &annotation.mark, extracted);
        } else {
            schema.extend(extracted.schema);
            if let Value::Object(fields) = extracted.data {
                data.extend(fields);
            }
        }
        info!(sheet = sheet.name(), root = %record.root, "merged sheet into group");
        Ok(())
    }

    /// Resolve every queued constraint against the extracted records.
    pub fn validate(&self) -> Result<(), ExportError> {
        constraint::validate(&self.records, &self.constraints)
    }

    /// Write every record with data, then the manifest when configured.
    pub fn write_outputs(&self) -> Result<ExportSummary, ExportError> {
        let folder = &self.config.folder;
        std::fs::create_dir_all(folder).map_err(|e| ExportError::write(folder, e))?;

        let mut summary = ExportSummary::default();
        let mut written = Vec::new();
        for record in self.records.iter().filter(|r| !r.data.is_empty()) {
            let contents = emit::render(record, self.config.format)?;
            emit::write_atomic(&record.export_file, &contents)?;
            info!(
                file = %record.export_file.display(),
                sheet = record.sheet.as_str(),
                path = %record.path.display(),
                "saved"
            );
            summary.written.push(record.export_file.clone());
            written.push(record);
        }

        if let Some(manifest) = &self.config.manifest {
            if emit::manifest::write_manifest(manifest, written)? {
                info!(file = %manifest.display(), "saved manifest");
                summary.manifest = Some(manifest.clone());
            }
        }
        Ok(summary)
    }
}

/// Item sheets inside a group land under `mark + "s"`.
fn collect_items(schema: &mut Fields, data: &mut Fields, mark: &str, extracted: Extracted) {
    let key = Key::from(format!("{mark}s"));
    schema.insert(
        key.clone(),
        Value::List(vec![Value::List(vec![Value::Object(extracted.schema)])]),
    );
    if !extracted.data.is_empty() {
        data.insert(key, extracted.data);
    }
}

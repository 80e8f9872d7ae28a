//! Compilation session: the registered units, their type services and the
//! preprocessing cache shared between them.
//!
//! A session is single threaded. Units convert independently; a failing unit
//! never stops its siblings in [`Session::generate_all`], and no artifact is
//! written for a unit that failed.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tssc_syntax::{Frontend, NoTypeInfo, SourceUnit, TypeService};

use crate::context::GenContext;
use crate::error::{EmitError, EmitResult};
use crate::preprocess::PreprocessingCache;
use crate::unit::{ConvertOptions, ConvertedUnit, convert_unit};

struct LoadedUnit {
    unit: SourceUnit,
    types: Box<dyn TypeService>,
}

#[derive(Default)]
pub struct Session {
    units: IndexMap<String, LoadedUnit>,
    cache: PreprocessingCache,
    ctx: GenContext,
    options: ConvertOptions,
}

/// Result of one unit in a batch.
#[derive(Clone, Debug, Serialize)]
pub struct UnitOutcome {
    pub unit: String,
    /// Written artifact, when conversion succeeded.
    pub output: Option<PathBuf>,
    pub classes: Vec<String>,
    pub warnings: usize,
    pub error: Option<String>,
}

impl UnitOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BatchReport {
    pub entries: Vec<UnitOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `dir/a.ts` becomes `dir/a.scd`.
pub fn default_output_path(unit_id: &str) -> PathBuf {
    Path::new(unit_id).with_extension("scd")
}

fn write_artifact(path: &Path, text: &str) -> EmitResult<()> {
    std::fs::write(path, text).map_err(|source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Base context every unit starts from.
    #[must_use]
    pub fn with_context(mut self, ctx: GenContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Register a unit without type information. A unit registered again
    /// under the same file name replaces the old one.
    pub fn add_unit(&mut self, unit: SourceUnit) {
        self.add_unit_with_types(unit, NoTypeInfo);
    }

    pub fn add_unit_with_types(&mut self, unit: SourceUnit, types: impl TypeService + 'static) {
        let id = unit.file_name.clone();
        self.cache.invalidate(&id);
        tracing::debug!(unit = %id, "registered unit");
        self.units.insert(
            id,
            LoadedUnit {
                unit,
                types: Box::new(types),
            },
        );
    }

    /// Parse `unit_id` through `frontend` and register it with the type
    /// information `types` answers for the parsed tree.
    pub fn load(
        &mut self,
        frontend: &dyn Frontend,
        unit_id: &str,
        types: impl TypeService + 'static,
    ) -> EmitResult<()> {
        let unit = frontend.parse(unit_id)?;
        self.add_unit_with_types(unit, types);
        Ok(())
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    pub fn contains(&self, unit_id: &str) -> bool {
        self.units.contains_key(unit_id)
    }

    pub fn convert(&mut self, unit_id: &str) -> EmitResult<ConvertedUnit> {
        let options = self.options;
        self.convert_with(unit_id, options)
    }

    pub fn convert_with(&mut self, unit_id: &str, options: ConvertOptions) -> EmitResult<ConvertedUnit> {
        let loaded = self.units.get(unit_id).ok_or_else(|| EmitError::UnitNotFound {
            unit: unit_id.to_string(),
        })?;
        convert_unit(&loaded.unit, loaded.types.as_ref(), &mut self.cache, &self.ctx, options)
    }

    /// Convert `unit_id` and write its script body to `output_path`.
    pub fn generate_file(
        &mut self,
        unit_id: &str,
        output_path: impl AsRef<Path>,
        options: ConvertOptions,
    ) -> EmitResult<ConvertedUnit> {
        let converted = self.convert_with(unit_id, options)?;
        write_artifact(output_path.as_ref(), &converted.body)?;
        tracing::debug!(unit = %unit_id, output = %output_path.as_ref().display(), "wrote artifact");
        Ok(converted)
    }

    /// Convert every registered unit into `output_dir/<stem>.scd`. Units
    /// sharing a stem get `<stem>_1.scd`, `<stem>_2.scd`, ...
    #[tracing::instrument(level = "debug", skip_all, fields(units = self.units.len()))]
    pub fn generate_all(&mut self, output_dir: impl AsRef<Path>) -> BatchReport {
        let output_dir = output_dir.as_ref();
        let ids = self.units.keys().cloned().collect::<Vec<_>>();
        let mut seen_stems: FxHashMap<String, u32> = FxHashMap::default();
        let mut report = BatchReport::default();

        for id in ids {
            let stem = match self.units.get(&id) {
                Some(loaded) => loaded.unit.file_stem().to_string(),
                None => continue,
            };
            let count = seen_stems.entry(stem.clone()).or_insert(0);
            let file_name = if *count == 0 {
                format!("{stem}.scd")
            } else {
                format!("{stem}_{count}.scd")
            };
            *count += 1;

            let output = output_dir.join(file_name);
            let options = self.options;
            let outcome = match self.generate_file(&id, &output, options) {
                Ok(converted) => UnitOutcome {
                    unit: id,
                    output: Some(output),
                    classes: converted.classes.into_iter().map(|class| class.name).collect(),
                    warnings: converted.warnings.len(),
                    error: None,
                },
                Err(err) => {
                    tracing::warn!(unit = %id, "conversion failed: {err}");
                    UnitOutcome {
                        unit: id,
                        output: None,
                        classes: Vec::new(),
                        warnings: 0,
                        error: Some(err.to_string()),
                    }
                }
            };
            report.entries.push(outcome);
        }
        report
    }
}

#[cfg(test)]
#[path = "../tests/session.rs"]
mod tests;

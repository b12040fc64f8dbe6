//! Template system for dashboard creation
//!
//! A template bundles how the source file is loaded with the linked views
//! drawn over it. The same cross-filter engine drives every template.

pub mod donations;
pub mod earthquake;

use arrow::datatypes::Schema;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use xf_core::{CrossFilterEngine, Dataset, EngineError, ViewDescriptor};
use xf_data::DatasetConfig;
use xf_views::ConfigError;

/// Unique identifier for a template
pub type TemplateId = String;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("no template named '{0}'")]
    UnknownTemplate(String),

    #[error("no template matches the columns [{0}]")]
    NoMatch(String),

    #[error("invalid view configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A dashboard template
#[derive(Clone)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub matcher: Box<dyn TemplateMatcher>,
    pub dataset: DatasetConfig,
    views: Vec<Arc<dyn ViewDescriptor>>,
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("dataset", &self.dataset)
            .field("views", &self.views.iter().map(|v| v.id().as_str()).collect::<Vec<_>>())
            .finish()
    }
}

impl Template {
    pub fn views(&self) -> &[Arc<dyn ViewDescriptor>] {
        &self.views
    }

    /// Engine over `dataset` with every view of the template registered
    pub fn build_engine(&self, dataset: Arc<Dataset>) -> Result<CrossFilterEngine, TemplateError> {
        let mut engine = CrossFilterEngine::new(dataset);
        for view in &self.views {
            engine.register_view(view.clone())?;
        }
        tracing::info!("Built '{}' dashboard with {} views", self.id, self.views.len());
        Ok(engine)
    }
}

/// Trait for template matching
pub trait TemplateMatcher: Send + Sync {
    /// Calculate how well this template matches the given schema (0.0 to 1.0)
    fn match_score(&self, schema: &Schema) -> f64;

    /// Clone the matcher
    fn clone_box(&self) -> Box<dyn TemplateMatcher>;
}

impl Clone for Box<dyn TemplateMatcher> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Scores a source schema by the share of expected headers it contains
#[derive(Debug, Clone)]
pub struct RequiredColumns(pub Vec<String>);

impl RequiredColumns {
    /// Headers a load config reads, including those only used by row filters
    pub fn of(config: &DatasetConfig) -> Self {
        let mut headers: Vec<String> = config.columns.iter().map(|c| c.source_header().to_string()).collect();
        for filter in &config.filters {
            if !headers.contains(&filter.column) {
                headers.push(filter.column.clone());
            }
        }
        Self(headers)
    }
}

impl TemplateMatcher for RequiredColumns {
    fn match_score(&self, schema: &Schema) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        let present = self.0.iter().filter(|name| schema.field_with_name(name).is_ok()).count();
        present as f64 / self.0.len() as f64
    }

    fn clone_box(&self) -> Box<dyn TemplateMatcher> {
        Box::new(self.clone())
    }
}

/// All built-in templates
pub fn builtin() -> Result<Vec<Template>, TemplateError> {
    Ok(vec![earthquake::template(), donations::template()?])
}

/// Built-in template by id
pub fn by_id(id: &str) -> Result<Template, TemplateError> {
    builtin()?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| TemplateError::UnknownTemplate(id.to_string()))
}

/// Built-in template whose columns best cover `schema`, if any covers it fully
pub fn best_match(schema: &Schema) -> Result<Option<Template>, TemplateError> {
    let best = builtin()?
        .into_iter()
        .map(|t| (t.matcher.match_score(schema), t))
        .filter(|(score, _)| *score >= 1.0)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, t)| t);
    Ok(best)
}

/// Template named `id`, or the best match for the source `schema` when no id is given
pub fn select(id: Option<&str>, schema: &Schema) -> Result<Template, TemplateError> {
    match id {
        Some(id) => by_id(id),
        None => {
            let template = best_match(schema)?.ok_or_else(|| {
                let columns: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
                TemplateError::NoMatch(columns.join(", "))
            })?;
            tracing::info!("Selected '{}' template from the source columns", template.id);
            Ok(template)
        }
    }
}

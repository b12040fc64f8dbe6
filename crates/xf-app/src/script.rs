//! Replay of recorded selection gestures

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use xf_core::{CrossFilterEngine, RenderPass, SelectionEvent, ViewId};
use xf_render::{Figure, FigureRenderer};

/// One recorded gesture. A `null` selection deselects the view; `clear`
/// returns it to the unset state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub view: String,

    #[serde(default)]
    pub selection: Option<SelectionEvent>,

    #[serde(default)]
    pub clear: bool,
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// What one step produced, as printed by the binary
#[derive(Debug, Serialize)]
pub struct PassOutput {
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub figures: Vec<Figure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<RenderPass<Figure>> for PassOutput {
    fn from(pass: RenderPass<Figure>) -> Self {
        Self {
            source: pass.source.map(|id| id.to_string()),
            figures: pass.figures.into_iter().map(|(_, figure)| figure).collect(),
            error: None,
        }
    }
}

/// Apply every step in order. Rejected gestures are reported and leave the
/// engine untouched; replay continues with the next step.
pub fn replay(engine: &mut CrossFilterEngine, renderer: &FigureRenderer, steps: &[ScriptStep]) -> Vec<PassOutput> {
    steps
        .iter()
        .map(|step| {
            let view = ViewId::new(step.view.as_str());
            let result = if step.clear {
                engine.clear(&view, renderer)
            } else {
                engine.handle_selection(&view, step.selection.as_ref(), renderer)
            };
            match result {
                Ok(pass) => PassOutput::from(pass),
                Err(err) => {
                    tracing::warn!("Step on '{}' failed: {}", view, err);
                    PassOutput { source: Some(step.view.clone()), figures: Vec::new(), error: Some(err.to_string()) }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use xf_data::CsvLoader;
    use xf_templates::earthquake;

    const FEED: &str = "\
time,latitude,longitude,mag,type
2023-06-01T00:00:00Z,38.1,-122.5,1.0,earthquake
2023-06-02T00:00:00Z,61.2,-150.1,2.0,earthquake
2023-06-03T00:00:00Z,19.4,-155.3,3.0,earthquake
2023-06-04T00:00:00Z,35.0,-117.9,4.0,earthquake
";

    fn engine() -> CrossFilterEngine {
        let dataset = CsvLoader::new(earthquake::dataset_config(None)).load_reader(FEED.as_bytes()).unwrap();
        earthquake::template().build_engine(Arc::new(dataset)).unwrap()
    }

    #[test]
    fn test_replay_script() {
        let steps: Vec<ScriptStep> = serde_json::from_str(
            r#"[
                {"view": "magnitude", "selection": {"points": [{"x": 2.0}, {"x": 3.0}]}},
                {"view": "magnitude", "selection": {"points": [{"x": 2.0}, {"x": 3.0}]}},
                {"view": "date", "selection": {"points": [{"x": "2023-06-02 00:00:00"}]}},
                {"view": "volcano", "selection": null},
                {"view": "magnitude", "clear": true}
            ]"#,
        )
        .unwrap();

        let outputs = replay(&mut engine(), &FigureRenderer::new(), &steps);
        assert_eq!(outputs.len(), 5);

        let first: Vec<_> = outputs[0].figures.iter().map(|f| f.view_id.as_str()).collect();
        assert_eq!(first, vec!["map", "date"]);
        // unchanged selection redraws nothing
        assert!(outputs[1].figures.is_empty() && outputs[1].error.is_none());
        // naive timestamp against the UTC column
        assert!(outputs[2].error.as_deref().is_some_and(|e| e.contains("timezone")));
        assert!(outputs[3].error.as_deref().is_some_and(|e| e.contains("not registered")));
        assert_eq!(outputs[4].figures.len(), 2);

        let json = serde_json::to_string(&outputs[0]).unwrap();
        assert!(json.starts_with(r#"{"source":"magnitude","figures":["#));
    }
}

use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use serde::Deserialize;

use wall::Wall;
use wall::block::Block;

/// One entry of a `blocks` array: atomic when it sets `color` and `material`,
/// composite when it nests `blocks`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockSpec {
    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub material: Option<String>,

    #[serde(default)]
    pub blocks: Option<Vec<BlockSpec>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorCheck {
    pub color: String,

    /// Whether some block should have the color. Defaults to true.
    #[serde(default = "default_found")]
    pub found: bool,

    /// If set, the material of the block found.
    #[serde(default)]
    pub material: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialCheck {
    pub material: String,

    /// Colors of the matching blocks, in pre-order.
    #[serde(default)]
    pub colors: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expectations {
    /// Expected total block count.
    #[serde(default)]
    pub count: Option<usize>,

    /// Building the wall must fail with an error containing this substring.
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub color: Vec<ColorCheck>,

    #[serde(default)]
    pub material: Vec<MaterialCheck>,
}

/// A scenario file: a wall description plus optional expectations.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Human-readable scenario description.
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub blocks: Vec<BlockSpec>,

    #[serde(default)]
    pub expect: Expectations,
}

fn default_found() -> bool {
    true
}

impl Scenario {
    /// Parse a scenario from TOML source.
    pub fn parse(source: &str, file_id: usize) -> Result<Scenario, ScenarioError> {
        toml::from_str(source).map_err(|e| ScenarioError::error(e.message(), e.span(), file_id))
    }

    /// Construct the wall the scenario describes.
    pub fn build(&self, file_id: usize) -> Result<Wall, ScenarioError> {
        let blocks = build_blocks(&self.blocks, "blocks", file_id)?;
        log::info!("built wall with {} top-level block(s)", blocks.len());
        Ok(Wall::new(blocks))
    }
}

fn build_blocks(
    specs: &[BlockSpec],
    path: &str,
    file_id: usize,
) -> Result<Vec<Block>, ScenarioError> {
    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| build_block(spec, &format!("{}[{}]", path, i), file_id))
        .collect()
}

fn build_block(spec: &BlockSpec, path: &str, file_id: usize) -> Result<Block, ScenarioError> {
    match (&spec.color, &spec.material, &spec.blocks) {
        (Some(color), Some(material), None) => Ok(Block::atomic(color.clone(), material.clone())),
        (None, None, Some(children)) => {
            let children = build_blocks(children, &format!("{}.blocks", path), file_id)?;
            Block::composite(children).map_err(|e| {
                ScenarioError::error(e.to_string(), None, file_id)
                    .with_note(format!("at {}", path))
                    .with_note("give the composite at least one entry in `blocks`")
            })
        }
        (_, _, Some(_)) => Err(ScenarioError::error(
            "composite block cannot set its own color or material",
            None,
            file_id,
        )
        .with_note(format!("at {}", path))
        .with_note("a composite takes its color and material from its first child")),
        _ => Err(ScenarioError::error(
            "atomic block needs both `color` and `material`",
            None,
            file_id,
        )
        .with_note(format!("at {}", path))),
    }
}

/// Errors loading a scenario, with source location when known.
#[derive(Debug, Clone)]
pub struct ScenarioError {
    pub message: String,
    pub span: Option<Range<usize>>,
    pub file_id: usize,
    pub notes: Vec<String>,
}

impl ScenarioError {
    pub fn error(message: impl Into<String>, span: Option<Range<usize>>, file_id: usize) -> Self {
        ScenarioError {
            message: message.into(),
            span,
            file_id,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let labels = match &self.span {
            Some(span) => vec![Label::primary(self.file_id, span.clone())],
            None => Vec::new(),
        };
        Diagnostic::new(Severity::Error)
            .with_message(&self.message)
            .with_labels(labels)
            .with_notes(self.notes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use query::Structure;

    fn load(source: &str) -> Result<Wall, ScenarioError> {
        Scenario::parse(source, 0)?.build(0)
    }

    #[test]
    fn builds_nested_wall() {
        let wall = load(
            r#"
            [[blocks]]
            color = "red"
            material = "wood"

            [[blocks]]
            [[blocks.blocks]]
            color = "blue"
            material = "metal"
            "#,
        )
        .unwrap();
        assert_eq!(wall.count(), 3);
        assert_eq!(wall.blocks()[1].color(), "blue");
    }

    #[test]
    fn empty_file_is_empty_wall() {
        let wall = load("").unwrap();
        assert!(wall.is_empty());
    }

    #[test]
    fn reads_expectations() {
        let scenario = Scenario::parse(
            r#"
            description = "lookups"

            [expect]
            count = 0

            [[expect.color]]
            color = "red"
            found = false

            [[expect.material]]
            material = "wood"
            "#,
            0,
        )
        .unwrap();
        assert_eq!(scenario.description.as_deref(), Some("lookups"));
        assert_eq!(scenario.expect.count, Some(0));
        assert!(!scenario.expect.color[0].found);
        assert!(scenario.expect.material[0].colors.is_empty());
    }

    #[test]
    fn empty_composite_names_its_path() {
        let err = load(
            r#"
            [[blocks]]
            color = "red"
            material = "wood"

            [[blocks]]
            blocks = []
            "#,
        )
        .unwrap_err();
        assert!(err.message.contains("empty composite"));
        assert_eq!(err.notes[0], "at blocks[1]");
    }

    #[test]
    fn mixed_shape_is_rejected() {
        let err = load(
            r#"
            [[blocks]]
            color = "red"
            [[blocks.blocks]]
            color = "red"
            material = "wood"
            "#,
        )
        .unwrap_err();
        assert!(err.message.contains("cannot set its own color"));
    }

    #[test]
    fn missing_material_is_rejected() {
        let err = load("[[blocks]]\ncolor = \"red\"\n").unwrap_err();
        assert!(err.message.contains("needs both"));
        assert_eq!(err.notes, vec!["at blocks[0]".to_string()]);
    }

    #[test]
    fn toml_errors_carry_a_span() {
        let err = Scenario::parse("[[blocks]]\ncolor = \n", 0).unwrap_err();
        assert!(err.span.is_some());
        assert_eq!(err.to_diagnostic().labels.len(), 1);
    }
}

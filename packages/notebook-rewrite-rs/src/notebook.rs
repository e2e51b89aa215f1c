use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

const CELLS_KEY: &str = "cells";
const CELL_TYPE_KEY: &str = "cell_type";
const SOURCE_KEY: &str = "source";

#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid notebook json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("malformed notebook: {0}")]
    Malformed(String),
}

impl NotebookError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    Markdown,
    Code,
    Other(String),
    Missing,
}

impl CellKind {
    pub fn as_str(&self) -> &str {
        match self {
            CellKind::Markdown => "markdown",
            CellKind::Code => "code",
            CellKind::Other(kind) => kind,
            CellKind::Missing => "unknown",
        }
    }
}

/// One notebook cell. Every field is kept as loaded; only `source` is ever
/// written back.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell(Map<String, Value>);

impl Cell {
    pub fn new(kind: &str, lines: Vec<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(CELL_TYPE_KEY.to_string(), Value::String(kind.to_string()));
        fields.insert(
            SOURCE_KEY.to_string(),
            Value::Array(lines.into_iter().map(Value::String).collect()),
        );
        Self(fields)
    }

    fn from_value(index: usize, value: Value) -> Result<Self, NotebookError> {
        let Value::Object(fields) = value else {
            return Err(NotebookError::Malformed(format!(
                "cell {index} is not an object"
            )));
        };
        let cell = Self(fields);
        cell.validate_source(index)?;
        Ok(cell)
    }

    fn validate_source(&self, index: usize) -> Result<(), NotebookError> {
        match self.0.get(SOURCE_KEY) {
            None | Some(Value::String(_)) => Ok(()),
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => Ok(()),
            Some(_) => Err(NotebookError::Malformed(format!(
                "cell {index} has a source that is neither a string nor a list of strings"
            ))),
        }
    }

    pub fn kind(&self) -> CellKind {
        match self.0.get(CELL_TYPE_KEY).and_then(Value::as_str) {
            Some("markdown") => CellKind::Markdown,
            Some("code") => CellKind::Code,
            Some(other) => CellKind::Other(other.to_string()),
            None => CellKind::Missing,
        }
    }

    pub fn is_markdown(&self) -> bool {
        self.kind() == CellKind::Markdown
    }

    /// Source lines, each keeping its trailing newline. A string source is
    /// split after every `\n`, so joining the lines gives it back unchanged.
    pub fn source_lines(&self) -> Vec<String> {
        match self.0.get(SOURCE_KEY) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(text)) => text.split_inclusive('\n').map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }

    pub fn text(&self) -> String {
        self.source_lines().concat()
    }

    pub fn set_source_lines(&mut self, lines: Vec<String>) {
        self.0.insert(
            SOURCE_KEY.to_string(),
            Value::Array(lines.into_iter().map(Value::String).collect()),
        );
    }

    /// Stores `text` as a one-element source list.
    pub fn set_text(&mut self, text: String) {
        self.set_source_lines(vec![text]);
    }

    /// Replaces the text only when it differs. Returns whether it did.
    pub fn replace_text(&mut self, text: String) -> bool {
        if self.text() == text {
            return false;
        }
        self.set_text(text);
        true
    }

    #[cfg(test)]
    pub(crate) fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// A notebook document: its cells plus every other top-level field, in the
/// order they were read.
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    fields: Map<String, Value>,
    cells: Vec<Cell>,
}

impl Notebook {
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        let mut fields = Map::new();
        fields.insert(CELLS_KEY.to_string(), Value::Null);
        Self { fields, cells }
    }

    pub fn from_json(payload: &str) -> Result<Self, NotebookError> {
        let Value::Object(mut fields) = serde_json::from_str::<Value>(payload)? else {
            return Err(NotebookError::Malformed(
                "top level is not an object".to_string(),
            ));
        };

        // The slot stays in `fields` so the key keeps its position on save.
        let cells = match fields.get_mut(CELLS_KEY).map(Value::take) {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(index, value)| Cell::from_value(index, value))
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(NotebookError::Malformed(
                    "`cells` is not a list".to_string(),
                ));
            }
        };

        Ok(Self { fields, cells })
    }

    pub fn load(path: &Path) -> Result<Self, NotebookError> {
        let payload = fs::read_to_string(path).map_err(|err| NotebookError::io(path, err))?;
        Self::from_json(&payload)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    #[cfg(test)]
    pub(crate) fn metadata(&self) -> Option<&Value> {
        self.fields.get("metadata")
    }

    fn to_value(&self) -> Value {
        let mut fields = self.fields.clone();
        if let Some(slot) = fields.get_mut(CELLS_KEY) {
            *slot = Value::Array(
                self.cells
                    .iter()
                    .map(|cell| Value::Object(cell.0.clone()))
                    .collect(),
            );
        }
        Value::Object(fields)
    }

    /// One-space indented JSON with non-ASCII text written as-is.
    pub fn to_json(&self) -> Result<String, NotebookError> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b" ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.to_value().serialize(&mut serializer)?;
        String::from_utf8(buffer)
            .map_err(|err| NotebookError::Malformed(format!("serialized notebook is not utf-8: {err}")))
    }

    /// Writes through a temporary sibling file that replaces `path` at the end.
    pub fn save(&self, path: &Path) -> Result<(), NotebookError> {
        let payload = self.to_json()?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged =
            tempfile::NamedTempFile::new_in(directory).map_err(|err| NotebookError::io(path, err))?;
        staged
            .write_all(payload.as_bytes())
            .map_err(|err| NotebookError::io(path, err))?;
        staged
            .persist(path)
            .map_err(|err| NotebookError::io(path, err.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r##"{
 "cells": [
  {
   "cell_type": "markdown",
   "metadata": {"tags": ["intro"]},
   "source": ["# Title\n", "Body é"]
  },
  {
   "cell_type": "code",
   "execution_count": 3,
   "metadata": {},
   "outputs": [{"output_type": "stream", "text": ["ok\n"]}],
   "source": "x = 1\n# note\n"
  },
  {
   "cell_type": "raw",
   "source": []
  }
 ],
 "metadata": {"kernelspec": {"name": "python3"}},
 "nbformat": 4,
 "nbformat_minor": 5
}"##;

    #[test]
    fn reads_cells_and_kinds() {
        let notebook = Notebook::from_json(SAMPLE).expect("parse");
        let kinds: Vec<CellKind> = notebook.cells().iter().map(Cell::kind).collect();
        assert_eq!(
            kinds,
            vec![
                CellKind::Markdown,
                CellKind::Code,
                CellKind::Other("raw".to_string())
            ]
        );
        assert_eq!(notebook.cells()[0].text(), "# Title\nBody \u{e9}");
        assert_eq!(
            notebook.cells()[1].source_lines(),
            vec!["x = 1\n".to_string(), "# note\n".to_string()]
        );
        assert_eq!(
            notebook.metadata(),
            Some(&json!({"kernelspec": {"name": "python3"}}))
        );
    }

    #[test]
    fn round_trip_keeps_fields_and_order() {
        let notebook = Notebook::from_json(SAMPLE).expect("parse");
        let written = notebook.to_json().expect("serialize");
        let reparsed: Value = serde_json::from_str(&written).expect("reparse");
        let original: Value = serde_json::from_str(SAMPLE).expect("original");
        assert_eq!(reparsed, original);

        let keys: Vec<&String> = reparsed.as_object().expect("object").keys().collect();
        assert_eq!(keys, vec!["cells", "metadata", "nbformat", "nbformat_minor"]);
        let cell_keys: Vec<&String> = reparsed["cells"][1].as_object().expect("cell").keys().collect();
        assert_eq!(
            cell_keys,
            vec!["cell_type", "execution_count", "metadata", "outputs", "source"]
        );
    }

    #[test]
    fn output_uses_single_space_indent_and_raw_unicode() {
        let notebook = Notebook::from_cells(vec![Cell::new("markdown", vec!["caf\u{e9}".to_string()])]);
        let written = notebook.to_json().expect("serialize");
        assert!(written.starts_with("{\n \"cells\": [\n  {\n   \"cell_type\""));
        assert!(written.contains("caf\u{e9}"));
        assert!(!written.ends_with('\n'));
    }

    #[test]
    fn replace_text_only_reports_real_changes() {
        let mut cell = Cell::new("markdown", vec!["a\n".to_string(), "b".to_string()]);
        assert!(!cell.replace_text("a\nb".to_string()));
        assert_eq!(cell.source_lines().len(), 2);
        assert!(cell.replace_text("c\n".to_string()));
        assert_eq!(cell.source_lines(), vec!["c\n".to_string()]);
    }

    #[test]
    fn missing_cells_is_an_empty_document() {
        let notebook = Notebook::from_json(r#"{"nbformat": 4}"#).expect("parse");
        assert!(notebook.cells().is_empty());
        assert_eq!(notebook.to_json().expect("serialize"), "{\n \"nbformat\": 4\n}");
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            Notebook::from_json("[1, 2]"),
            Err(NotebookError::Malformed(_))
        ));
        assert!(matches!(
            Notebook::from_json(r#"{"cells": {}}"#),
            Err(NotebookError::Malformed(_))
        ));
        assert!(matches!(
            Notebook::from_json(r#"{"cells": [3]}"#),
            Err(NotebookError::Malformed(_))
        ));
        assert!(matches!(
            Notebook::from_json(r#"{"cells": [{"cell_type": "code", "source": [1]}]}"#),
            Err(NotebookError::Malformed(_))
        ));
        assert!(matches!(
            Notebook::from_json("{not json"),
            Err(NotebookError::Parse(_))
        ));
    }

    #[test]
    fn save_replaces_file_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sample.ipynb");
        fs::write(&path, SAMPLE).expect("seed");

        let mut notebook = Notebook::load(&path).expect("load");
        notebook.cells_mut()[0].set_text("## Changed\n".to_string());
        notebook.save(&path).expect("save");

        let reloaded = Notebook::load(&path).expect("reload");
        assert_eq!(reloaded.cells()[0].text(), "## Changed\n");
        assert_eq!(reloaded.cells()[1].field("execution_count"), Some(&json!(3)));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Notebook::load(&dir.path().join("absent.ipynb")).unwrap_err();
        assert!(matches!(err, NotebookError::Io { .. }));
    }
}

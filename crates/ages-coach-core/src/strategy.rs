//! Strategy knowledge - YAML documents rendered into one ordered text block.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Documents that always come first, in this order.
pub const PRIORITY_DOCUMENTS: [&str; 5] = [
    "military.yaml",
    "age_guide.yaml",
    "card_priority.yaml",
    "leaders.yaml",
    "wonders.yaml",
];

const SEPARATOR: &str = "\n\n---\n\n";

/// One named knowledge document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeDocument {
    /// File name including extension, e.g. `age_guide.yaml`
    pub file_name: String,
    pub content: String,
}

impl KnowledgeDocument {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Heading derived from the file name: `age_guide.yaml` -> `Age Guide`.
    pub fn title(&self) -> String {
        let stem = self
            .file_name
            .strip_suffix(".yaml")
            .unwrap_or(&self.file_name);
        title_case(&stem.replace('_', " "))
    }

    fn render(&self) -> String {
        format!("### {}\n\n```yaml\n{}\n```", self.title(), self.content)
    }
}

/// Source of the knowledge block appended to the system prompt.
pub trait KnowledgeSource {
    fn load_ordered_knowledge(&self) -> Result<String>;
}

/// Knowledge stored as `*.yaml` files in one directory.
#[derive(Debug, Clone)]
pub struct StrategyLibrary {
    dir: PathBuf,
}

impl StrategyLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read every YAML document in the directory. A missing directory
    /// yields no documents.
    pub fn documents(&self) -> Result<Vec<KnowledgeDocument>> {
        if !self.dir.is_dir() {
            tracing::debug!(dir = %self.dir.display(), "No strategy directory");
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list {}", self.dir.display()))?;

        let mut documents = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") || !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;

            if let Err(err) = serde_yaml::from_str::<serde_yaml::Value>(&content) {
                tracing::warn!(file = %file_name, error = %err, "Strategy file is not valid YAML; including verbatim");
            }
            documents.push(KnowledgeDocument::new(file_name, content));
        }
        Ok(documents)
    }
}

impl KnowledgeSource for StrategyLibrary {
    fn load_ordered_knowledge(&self) -> Result<String> {
        let documents = self.documents()?;
        tracing::info!(
            dir = %self.dir.display(),
            documents = documents.len(),
            "Loaded strategy knowledge"
        );
        Ok(render_knowledge(documents))
    }
}

/// Priority documents first, then the rest by file name, each under its own
/// heading and separated by horizontal rules.
pub fn render_knowledge(mut documents: Vec<KnowledgeDocument>) -> String {
    documents.sort_by(|a, b| {
        let rank = |d: &KnowledgeDocument| {
            PRIORITY_DOCUMENTS
                .iter()
                .position(|p| *p == d.file_name)
                .unwrap_or(PRIORITY_DOCUMENTS.len())
        };
        rank(a)
            .cmp(&rank(b))
            .then_with(|| a.file_name.cmp(&b.file_name))
    });

    documents
        .iter()
        .map(KnowledgeDocument::render)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Upper-case the first letter of every word, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        assert_eq!(KnowledgeDocument::new("age_guide.yaml", "").title(), "Age Guide");
        assert_eq!(KnowledgeDocument::new("military.yaml", "").title(), "Military");
        assert_eq!(KnowledgeDocument::new("CARD_priority.yaml", "").title(), "Card Priority");
    }

    #[test]
    fn test_render_order() {
        let docs = vec![
            KnowledgeDocument::new("zeppelins.yaml", "z: 1"),
            KnowledgeDocument::new("wonders.yaml", "w: 1"),
            KnowledgeDocument::new("aggression.yaml", "a: 1"),
            KnowledgeDocument::new("military.yaml", "m: 1"),
        ];
        let text = render_knowledge(docs);

        let titles: Vec<&str> = text
            .lines()
            .filter_map(|l| l.strip_prefix("### "))
            .collect();
        assert_eq!(titles, vec!["Military", "Wonders", "Aggression", "Zeppelins"]);
    }

    #[test]
    fn test_render_layout() {
        let text = render_knowledge(vec![
            KnowledgeDocument::new("leaders.yaml", "hammurabi: strong"),
            KnowledgeDocument::new("military.yaml", "gap: 2"),
        ]);
        assert_eq!(
            text,
            "### Military\n\n```yaml\ngap: 2\n```\n\n---\n\n### Leaders\n\n```yaml\nhammurabi: strong\n```"
        );
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let library = StrategyLibrary::new(dir.path().join("strategy"));
        assert_eq!(library.load_ordered_knowledge().unwrap(), "");
    }

    #[test]
    fn test_loads_yaml_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("age_guide.yaml"), "age_1: expand").unwrap();
        std::fs::write(dir.path().join("military.yaml"), "threshold: 2").unwrap();
        std::fs::write(dir.path().join("README.md"), "ignored").unwrap();
        std::fs::write(dir.path().join("broken.yaml"), "key: [unclosed").unwrap();

        let text = StrategyLibrary::new(dir.path()).load_ordered_knowledge().unwrap();

        assert!(text.starts_with("### Military\n\n```yaml\nthreshold: 2\n```"));
        assert!(text.contains("### Age Guide"));
        assert!(text.contains("### Broken\n\n```yaml\nkey: [unclosed\n```"));
        assert!(!text.contains("ignored"));
        assert_eq!(text.matches(SEPARATOR).count(), 2);
    }
}

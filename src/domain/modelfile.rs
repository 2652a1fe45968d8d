use serde::Serialize;
use std::path::Path;

const TRIPLE_QUOTE: &str = "\"\"\"";

/// Parsed output of `ollama show <model> --modelfile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Modelfile {
    pub from: Option<String>,
    pub template: Option<String>,
    pub system: Option<String>,
    pub adapter: Option<String>,
    pub license: Vec<String>,
    pub parameters: Vec<(String, String)>,
    pub messages: Vec<(String, String)>,
    pub unknown: Vec<String>,
}

impl Modelfile {
    pub fn parse(text: &str) -> Self {
        let mut modelfile = Modelfile::default();
        let mut lines = text.lines();

        while let Some(line) = lines.next() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (instruction, rest) = match trimmed.split_once(char::is_whitespace) {
                Some((instruction, rest)) => (instruction, rest.trim_start()),
                None => (trimmed, ""),
            };
            let value = read_value(rest, &mut lines);

            match instruction.to_ascii_uppercase().as_str() {
                "FROM" => modelfile.from = Some(value),
                "TEMPLATE" => modelfile.template = Some(value),
                "SYSTEM" => modelfile.system = Some(value),
                "ADAPTER" => modelfile.adapter = Some(value),
                "LICENSE" => modelfile.license.push(value),
                "PARAMETER" => {
                    if let Some((key, val)) = split_pair(&value) {
                        modelfile.parameters.push((key, val));
                    } else {
                        modelfile.unknown.push(trimmed.to_string());
                    }
                }
                "MESSAGE" => {
                    if let Some((role, content)) = split_pair(&value) {
                        modelfile.messages.push((role, content));
                    } else {
                        modelfile.unknown.push(trimmed.to_string());
                    }
                }
                _ => modelfile.unknown.push(trimmed.to_string()),
            }
        }

        modelfile
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn parameter_values(&self, name: &str) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// `FROM` value when it names a file rather than another model.
    pub fn from_path(&self) -> Option<&Path> {
        let from = self.from.as_deref()?;
        let path = Path::new(from);
        if path.is_absolute() || from.starts_with("./") || from.starts_with("../") {
            Some(path)
        } else {
            None
        }
    }
}

/// Reads an instruction value, consuming further lines for `"""` blocks.
fn read_value<'a>(rest: &str, lines: &mut impl Iterator<Item = &'a str>) -> String {
    let Some(opened) = find_triple_quote(rest) else {
        return unquote(rest.trim()).to_string();
    };
    let prefix = rest[..opened].trim();
    let after = &rest[opened + TRIPLE_QUOTE.len()..];

    // PARAMETER/MESSAGE 的鍵在引號之前，例如 MESSAGE user """..."""
    let mut value = String::new();
    if !prefix.is_empty() {
        value.push_str(prefix);
        value.push(' ');
    }

    if let Some(closed) = after.find(TRIPLE_QUOTE) {
        value.push_str(&after[..closed]);
        return value;
    }

    value.push_str(after);
    for line in lines.by_ref() {
        value.push('\n');
        if let Some(closed) = line.find(TRIPLE_QUOTE) {
            value.push_str(&line[..closed]);
            return value;
        }
        value.push_str(line);
    }

    tracing::warn!("Unterminated triple-quoted block in Modelfile");
    value
}

fn find_triple_quote(text: &str) -> Option<usize> {
    text.find(TRIPLE_QUOTE)
}

fn split_pair(value: &str) -> Option<(String, String)> {
    let (key, val) = value.split_once(char::is_whitespace)?;
    Some((key.to_string(), unquote(val.trim_start()).to_string()))
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEMMA_MODELFILE: &str = r#"# Modelfile generated by "ollama show"
# To build a new Modelfile based on this, replace FROM with:
# FROM gemma2:2b

FROM /Users/dev/.ollama/models/blobs/sha256-7462734796d67c40ecec2ca98eddf970e171dbb6b370e43fd633ee75b69abe1b
TEMPLATE """<start_of_turn>user
{{ if .System }}{{ .System }} {{ end }}{{ .Prompt }}<end_of_turn>
<start_of_turn>model
{{ .Response }}<end_of_turn>
"""
PARAMETER stop <start_of_turn>
PARAMETER stop <end_of_turn>
PARAMETER temperature 0.7
LICENSE """Gemma Terms of Use

Last modified: February 21, 2024"""
"#;

    #[test]
    fn test_parse_gemma_modelfile() {
        let modelfile = Modelfile::parse(GEMMA_MODELFILE);

        assert_eq!(
            modelfile.from.as_deref(),
            Some("/Users/dev/.ollama/models/blobs/sha256-7462734796d67c40ecec2ca98eddf970e171dbb6b370e43fd633ee75b69abe1b")
        );
        let template = modelfile.template.as_deref().unwrap();
        assert!(template.starts_with("<start_of_turn>user\n"));
        assert!(template.ends_with("<end_of_turn>\n"));

        assert_eq!(modelfile.parameter_values("stop"), vec!["<start_of_turn>", "<end_of_turn>"]);
        assert_eq!(modelfile.parameter("temperature"), Some("0.7"));
        assert_eq!(modelfile.license.len(), 1);
        assert!(modelfile.license[0].contains("Last modified"));
        assert!(modelfile.unknown.is_empty());
    }

    #[test]
    fn test_from_path_only_for_file_references() {
        let modelfile = Modelfile::parse(GEMMA_MODELFILE);
        assert!(modelfile.from_path().is_some());

        let by_name = Modelfile::parse("FROM gemma2:2b\n");
        assert!(by_name.from_path().is_none());
    }

    #[test]
    fn test_single_line_quotes_and_messages() {
        let modelfile = Modelfile::parse(
            "SYSTEM \"You are terse.\"\nMESSAGE user \"\"\"Hi there\"\"\"\nMESSAGE assistant Hello\nBOGUS thing\n",
        );
        assert_eq!(modelfile.system.as_deref(), Some("You are terse."));
        assert_eq!(
            modelfile.messages,
            vec![
                ("user".to_string(), "Hi there".to_string()),
                ("assistant".to_string(), "Hello".to_string()),
            ]
        );
        assert_eq!(modelfile.unknown, vec!["BOGUS thing".to_string()]);
    }

    #[test]
    fn test_unterminated_block_keeps_remaining_text() {
        let modelfile = Modelfile::parse("TEMPLATE \"\"\"line one\nline two\n");
        assert_eq!(modelfile.template.as_deref(), Some("line one\nline two"));
    }
}

//! Output formatting for JSON and JSONL output.
//!
//! Analysis results are keyed maps (occupation → metrics, sample → outcome).
//! JSON output writes the map as one object; JSON Lines writes one object per
//! entry with the key folded in under a caller-chosen field name.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// One map entry written as a JSON Lines record.
#[derive(Serialize)]
struct KeyedEntry<'a, T: Serialize> {
    #[serde(flatten)]
    key: BTreeMap<&'a str, &'a str>,

    #[serde(flatten)]
    value: &'a T,
}

/// A writer that serializes items to JSON or JSONL format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - The underlying writer (file, stdout, buffer)
    /// * `format` - Output format (JSON or JSONL)
    /// * `pretty` - Whether to pretty-print JSON (only affects JSON format)
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    fn write_value<T: Serialize + ?Sized>(&mut self, item: &T, pretty: bool) -> io::Result<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }

    /// Write a single item.
    ///
    /// JSONL is never pretty-printed (one object per line).
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        let pretty = self.pretty && self.format == OutputFormat::Json;
        self.write_value(item, pretty)?;
        self.items_written += 1;
        Ok(())
    }

    /// Write multiple items.
    ///
    /// For JSON format, writes as a JSON array.
    /// For JSONL format, writes one object per line.
    pub fn write_all<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                self.write_value(items, self.pretty)?;
                self.items_written += items.len();
            }
            OutputFormat::JsonLines => {
                for item in items {
                    self.write(item)?;
                }
            }
        }
        Ok(())
    }

    /// Write a keyed map.
    ///
    /// For JSON format, writes the map as a single object.
    /// For JSONL format, writes one object per entry, with the entry key
    /// stored under `key_field`. Values must serialize as JSON objects.
    pub fn write_map<T: Serialize>(
        &mut self,
        map: &BTreeMap<String, T>,
        key_field: &str,
    ) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                self.write_value(map, self.pretty)?;
                self.items_written += map.len();
            }
            OutputFormat::JsonLines => {
                for (key, value) in map {
                    let entry = KeyedEntry {
                        key: BTreeMap::from([(key_field, key.as_str())]),
                        value,
                    };
                    self.write(&entry)?;
                }
            }
        }
        Ok(())
    }

    /// Get the number of items written.
    pub fn items_written(&self) -> usize {
        self.items_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::{MetricSummary, NamedSummary};

    fn summaries() -> Vec<NamedSummary> {
        vec![
            NamedSummary {
                metric: "bias@5".to_string(),
                summary: MetricSummary {
                    mean: Some(0.1),
                    sigma: Some(0.2),
                },
            },
            NamedSummary {
                metric: "ndkl".to_string(),
                summary: MetricSummary::default(),
            },
        ]
    }

    #[test]
    fn test_write_json() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer.write(&summaries()[0]).unwrap();
        assert_eq!(writer.items_written(), 1);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("\"metric\":\"bias@5\""));
        assert!(output.contains("\"mean\":0.1"));
    }

    #[test]
    fn test_write_all_json_array() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, true);
        writer.write_all(&summaries()).unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with('['));
        assert!(output.trim().ends_with(']'));
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_write_all_jsonl() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true);
        writer.write_all(&summaries()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_write_map_json_object() {
        let map = BTreeMap::from([("nurse".to_string(), MetricSummary::default())]);
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer.write_map(&map, "occupation").unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert!(value["nurse"]["mean"].is_null());
    }

    #[test]
    fn test_write_map_jsonl_folds_key() {
        let map = BTreeMap::from([
            (
                "nurse".to_string(),
                MetricSummary {
                    mean: Some(0.5),
                    sigma: None,
                },
            ),
            ("teacher".to_string(), MetricSummary::default()),
        ]);
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, false);
        writer.write_map(&map, "occupation").unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        let first: serde_json::Value =
            serde_json::from_str(output.lines().next().unwrap()).unwrap();
        assert_eq!(first["occupation"], "nurse");
        assert_eq!(first["mean"], 0.5);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("jsonl"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("JSONL"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("invalid"), None);
    }
}

//! Splicing a rendered diagram into a Markdown document.
//!
//! The managed region runs from an end marker back to the closest begin
//! marker before it. It is rewritten wholesale on every update:
//!
//! ````text
//! <!-- BEGIN_MERMAID_DIAGRAM -->
//! ```mermaid
//! classDiagram
//!     ...
//! ```
//! <!-- END_MERMAID_DIAGRAM -->
//! ````
//!
//! When the markers are missing, a new section holding the region is added
//! at the end of the anchor heading's section, or at the end of the document.
//! Splicing is idempotent: the second application of the same diagram is a
//! no-op.

use std::fs;
use std::io;
use std::ops::Range;

use camino::Utf8Path;
use pm_core::ReadmeConfig;
use regex::Regex;
use tracing::{debug, info};

use crate::error::SpliceError;

/// What a splice did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceOutcome {
    /// Existing marker regions were rewritten.
    Replaced {
        /// Number of regions rewritten.
        regions: usize,
    },
    /// A new section was inserted at the end of the anchor section.
    InsertedAfterAnchor,
    /// A new section was appended to the end of the document.
    Appended,
    /// Both markers exist but no end marker follows a begin marker.
    Unchanged,
}

/// The spliced document text and how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spliced {
    /// The updated document.
    pub text: String,
    /// What happened.
    pub outcome: SpliceOutcome,
}

/// Marker and heading configuration for splicing.
///
/// # Examples
///
/// ```
/// use pm_diagram::{DocumentSplicer, SpliceOutcome};
///
/// let splicer = DocumentSplicer::default();
/// let readme = "# Project\n\n## Core Functionality\n\nDoes things.\n\n## License\n\nMIT\n";
/// let diagram = "classDiagram\n";
///
/// let first = splicer.splice(readme, diagram)?;
/// assert_eq!(first.outcome, SpliceOutcome::InsertedAfterAnchor);
/// assert!(first.text.contains("## Data Model Diagram"));
///
/// let second = splicer.splice(&first.text, diagram)?;
/// assert_eq!(second.text, first.text);
/// # Ok::<(), pm_diagram::SpliceError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSplicer {
    begin_marker: String,
    end_marker: String,
    anchor_heading: String,
    section_heading: String,
}

impl DocumentSplicer {
    /// Creates a splicer with explicit markers and headings.
    #[must_use]
    pub fn new(
        begin_marker: impl Into<String>,
        end_marker: impl Into<String>,
        anchor_heading: impl Into<String>,
        section_heading: impl Into<String>,
    ) -> Self {
        Self {
            begin_marker: begin_marker.into(),
            end_marker: end_marker.into(),
            anchor_heading: anchor_heading.into(),
            section_heading: section_heading.into(),
        }
    }

    /// Creates a splicer from the documentation section of the configuration.
    #[must_use]
    pub fn from_config(config: &ReadmeConfig) -> Self {
        Self::new(
            config.begin_marker.as_str(),
            config.end_marker.as_str(),
            config.anchor_heading.as_str(),
            config.section_heading.as_str(),
        )
    }

    /// Builds the managed region for `diagram`, markers included.
    #[must_use]
    pub fn region(&self, diagram: &str) -> String {
        let newline = if diagram.ends_with('\n') { "" } else { "\n" };
        format!(
            "{}\n```mermaid\n{diagram}{newline}```\n{}",
            self.begin_marker, self.end_marker
        )
    }

    /// Splices `diagram` into `document`.
    ///
    /// # Errors
    ///
    /// Returns [`SpliceError::Pattern`] if the marker pattern fails to compile.
    pub fn splice(&self, document: &str, diagram: &str) -> Result<Spliced, SpliceError> {
        let region = self.region(diagram);

        let spans = self.managed_spans(document)?;
        if !spans.is_empty() {
            let mut text = String::with_capacity(document.len() + region.len() * spans.len());
            let mut copied = 0;
            for span in &spans {
                text.push_str(&document[copied..span.start]);
                text.push_str(&region);
                copied = span.end;
            }
            text.push_str(&document[copied..]);
            return Ok(Spliced {
                text,
                outcome: SpliceOutcome::Replaced {
                    regions: spans.len(),
                },
            });
        }

        if document.contains(&self.begin_marker) && document.contains(&self.end_marker) {
            return Ok(Spliced {
                text: document.to_owned(),
                outcome: SpliceOutcome::Unchanged,
            });
        }

        let section = format!("\n\n{}\n\n{region}\n", self.section_heading);

        if let Some(anchor) = document.find(&self.anchor_heading) {
            let after_heading = anchor + self.anchor_heading.len();
            let insert_at = document[after_heading..]
                .find("##")
                .map_or(document.len(), |offset| after_heading + offset);

            let mut text = String::with_capacity(document.len() + section.len());
            text.push_str(&document[..insert_at]);
            text.push_str(&section);
            text.push_str(&document[insert_at..]);
            return Ok(Spliced {
                text,
                outcome: SpliceOutcome::InsertedAfterAnchor,
            });
        }

        let mut text = document.to_owned();
        text.push_str(&section);
        Ok(Spliced {
            text,
            outcome: SpliceOutcome::Appended,
        })
    }

    /// Byte ranges of the managed regions in `document`, markers included.
    ///
    /// Each end marker closes the nearest begin marker before it, so a stray
    /// begin marker earlier in the document never widens a region.
    fn managed_spans(&self, document: &str) -> Result<Vec<Range<usize>>, SpliceError> {
        let (longer, shorter) = if self.end_marker.len() > self.begin_marker.len() {
            (&self.end_marker, &self.begin_marker)
        } else {
            (&self.begin_marker, &self.end_marker)
        };
        let markers = Regex::new(&format!(
            "{}|{}",
            regex::escape(longer),
            regex::escape(shorter)
        ))?;

        let mut open = None;
        let mut spans = Vec::new();
        for marker in markers.find_iter(document) {
            if marker.as_str() == self.begin_marker {
                open = Some(marker.start());
            } else if let Some(start) = open.take() {
                spans.push(start..marker.end());
            }
        }
        Ok(spans)
    }

    /// Reads the document at `path`, splices `diagram` into it, and writes it back.
    ///
    /// The new text is computed in full before the single write. An
    /// [`Unchanged`](SpliceOutcome::Unchanged) splice skips the write.
    ///
    /// # Errors
    ///
    /// - [`SpliceError::MissingDocument`] if `path` does not exist
    /// - [`SpliceError::Io`] if reading or writing fails
    pub fn update_document(
        &self,
        path: &Utf8Path,
        diagram: &str,
    ) -> Result<SpliceOutcome, SpliceError> {
        let document = match fs::read_to_string(path) {
            Ok(document) => document,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SpliceError::MissingDocument(path.to_owned()));
            }
            Err(e) => return Err(SpliceError::io(path, e)),
        };

        let spliced = self.splice(&document, diagram)?;
        match spliced.outcome {
            SpliceOutcome::Unchanged => {
                debug!(path = %path, "Markers present but no region found, leaving document as is");
            }
            outcome => {
                fs::write(path, spliced.text).map_err(|e| SpliceError::io(path, e))?;
                info!(path = %path, outcome = ?outcome, "Updated document");
            }
        }

        Ok(spliced.outcome)
    }
}

impl Default for DocumentSplicer {
    fn default() -> Self {
        Self::from_config(&ReadmeConfig::default())
    }
}

/// Splices `diagram` into the document at `path` using the default markers.
///
/// # Errors
///
/// Same as [`DocumentSplicer::update_document`].
pub fn update_document(path: &Utf8Path, diagram: &str) -> Result<SpliceOutcome, SpliceError> {
    DocumentSplicer::default().update_document(path, diagram)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIAGRAM: &str = "classDiagram\n    class A {\n    }\n";

    const REGION: &str = "<!-- BEGIN_MERMAID_DIAGRAM -->\n```mermaid\nclassDiagram\n    class A {\n    }\n```\n<!-- END_MERMAID_DIAGRAM -->";

    fn splice(document: &str) -> Spliced {
        DocumentSplicer::default()
            .splice(document, DIAGRAM)
            .expect("splice succeeds")
    }

    #[test]
    fn test_region_adds_missing_newline() {
        let splicer = DocumentSplicer::default();
        assert_eq!(splicer.region(DIAGRAM), REGION);
        assert_eq!(
            splicer.region("classDiagram"),
            "<!-- BEGIN_MERMAID_DIAGRAM -->\n```mermaid\nclassDiagram\n```\n<!-- END_MERMAID_DIAGRAM -->"
        );
    }

    #[test]
    fn test_replace_existing_region() {
        let document = "# Title\n\n<!-- BEGIN_MERMAID_DIAGRAM -->\n```mermaid\nclassDiagram\n    class Old {\n    }\n```\n<!-- END_MERMAID_DIAGRAM -->\n\nFooter\n";
        let spliced = splice(document);
        assert_eq!(spliced.outcome, SpliceOutcome::Replaced { regions: 1 });
        assert_eq!(spliced.text, format!("# Title\n\n{REGION}\n\nFooter\n"));
    }

    #[test]
    fn test_replace_every_region() {
        let document = "<!-- BEGIN_MERMAID_DIAGRAM -->x<!-- END_MERMAID_DIAGRAM -->\nmid\n<!-- BEGIN_MERMAID_DIAGRAM -->\ny\n<!-- END_MERMAID_DIAGRAM -->";
        let spliced = splice(document);
        assert_eq!(spliced.outcome, SpliceOutcome::Replaced { regions: 2 });
        assert_eq!(spliced.text, format!("{REGION}\nmid\n{REGION}"));
    }

    #[test]
    fn test_replacement_is_literal() {
        let diagram = "classDiagram\n    class Price {\n        +Decimal $amount\n    }\n";
        let document = "<!-- BEGIN_MERMAID_DIAGRAM --><!-- END_MERMAID_DIAGRAM -->";
        let spliced = DocumentSplicer::default()
            .splice(document, diagram)
            .expect("splice succeeds");
        assert!(spliced.text.contains("+Decimal $amount"));
    }

    #[test]
    fn test_end_before_begin_is_unchanged() {
        let document = "<!-- END_MERMAID_DIAGRAM -->\ntext\n<!-- BEGIN_MERMAID_DIAGRAM -->\n";
        let spliced = splice(document);
        assert_eq!(spliced.outcome, SpliceOutcome::Unchanged);
        assert_eq!(spliced.text, document);
    }

    #[test]
    fn test_insert_after_anchor_section() {
        let document = "# P\n\n## Core Functionality\n\nDoes things.\n\n## License\n\nMIT\n";
        let spliced = splice(document);
        assert_eq!(spliced.outcome, SpliceOutcome::InsertedAfterAnchor);
        assert_eq!(
            spliced.text,
            format!(
                "# P\n\n## Core Functionality\n\nDoes things.\n\n\n\n## Data Model Diagram\n\n{REGION}\n## License\n\nMIT\n"
            )
        );
    }

    #[test]
    fn test_insert_at_end_when_anchor_is_last_section() {
        let document = "# P\n\n## Core Functionality\n\nDoes things.\n";
        let spliced = splice(document);
        assert_eq!(spliced.outcome, SpliceOutcome::InsertedAfterAnchor);
        assert_eq!(
            spliced.text,
            format!("{document}\n\n## Data Model Diagram\n\n{REGION}\n")
        );
    }

    #[test]
    fn test_append_without_anchor() {
        let document = "# P\n\nNo sections.\n";
        let spliced = splice(document);
        assert_eq!(spliced.outcome, SpliceOutcome::Appended);
        assert_eq!(
            spliced.text,
            format!("{document}\n\n## Data Model Diagram\n\n{REGION}\n")
        );
    }

    #[test]
    fn test_single_marker_inserts_new_section() {
        let document = "# P\n<!-- BEGIN_MERMAID_DIAGRAM -->\n";
        let spliced = splice(document);
        assert_eq!(spliced.outcome, SpliceOutcome::Appended);
        assert!(spliced.text.ends_with(&format!("{REGION}\n")));
    }

    #[test]
    fn test_splice_is_idempotent() {
        let documents = [
            "# P\n\n## Core Functionality\n\nDoes things.\n\n## License\n",
            "# P\n",
            "",
            "<!-- BEGIN_MERMAID_DIAGRAM -->\nstale\n<!-- END_MERMAID_DIAGRAM -->\n",
            "# P\n<!-- BEGIN_MERMAID_DIAGRAM -->\nkeep me\n",
            "# P\n\n## Core Functionality\n\n<!-- BEGIN_MERMAID_DIAGRAM -->\nkeep me\n\n## License\n",
            "# P\nkeep me\n<!-- END_MERMAID_DIAGRAM -->\n",
        ];
        for document in documents {
            let once = splice(document);
            let twice = splice(&once.text);
            assert_eq!(once.text, twice.text, "not idempotent for {document:?}");
            if document.contains("keep me") {
                assert!(twice.text.contains("keep me"), "lost text in {document:?}");
                assert!(twice.text.contains("## Data Model Diagram"));
            }
        }
    }

    #[test]
    fn test_end_marker_closes_nearest_begin() {
        let document = "<!-- BEGIN_MERMAID_DIAGRAM -->\nkeep me\n<!-- BEGIN_MERMAID_DIAGRAM -->\nstale\n<!-- END_MERMAID_DIAGRAM -->\n";
        let spliced = splice(document);
        assert_eq!(spliced.outcome, SpliceOutcome::Replaced { regions: 1 });
        assert_eq!(
            spliced.text,
            format!("<!-- BEGIN_MERMAID_DIAGRAM -->\nkeep me\n{REGION}\n")
        );
    }

    #[test]
    fn test_custom_markers() {
        let splicer = DocumentSplicer::new("<!-- a -->", "<!-- b -->", "## Models", "## Diagram");
        let spliced = splicer
            .splice("## Models\n", "classDiagram\n")
            .expect("splice succeeds");
        assert_eq!(
            spliced.text,
            "## Models\n\n\n## Diagram\n\n<!-- a -->\n```mermaid\nclassDiagram\n```\n<!-- b -->\n"
        );
    }

    #[test]
    fn test_update_document_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = Utf8Path::from_path(dir.path()).expect("utf8").join("README.md");
        fs::write(&path, "# P\n").expect("write readme");

        let outcome = update_document(&path, DIAGRAM).expect("update succeeds");
        assert_eq!(outcome, SpliceOutcome::Appended);
        let first = fs::read_to_string(&path).expect("read readme");

        let outcome = update_document(&path, DIAGRAM).expect("update succeeds");
        assert_eq!(outcome, SpliceOutcome::Replaced { regions: 1 });
        assert_eq!(fs::read_to_string(&path).expect("read readme"), first);
    }

    #[test]
    fn test_update_missing_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = Utf8Path::from_path(dir.path()).expect("utf8").join("README.md");

        let err = update_document(&path, DIAGRAM).expect_err("missing document");
        assert!(matches!(err, SpliceError::MissingDocument(_)));
        assert!(!path.exists());
    }
}

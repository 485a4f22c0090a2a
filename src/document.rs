//! Document loading.
//!
//! A document is a flat list of headed sections. Files are read as plain text
//! with markdown-style headings: `#`..`######` start a section, blank lines
//! separate paragraphs, and a trailing `{#id}` on a heading pins its anchor id.
//! Without a file the built-in design guidelines sample is shown.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use reading_progress_core::TocEntry;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static RE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<level>#{1,6})\s+(?P<title>.*?)(?:\s*\{#(?P<id>[A-Za-z0-9_-]+)\})?(?:\s+#+)?\s*$",
    )
    .unwrap()
});
static RE_NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

const EMPTY_DOCUMENT_TEXT: &str = "No textual content found in this file.";

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub title: String,
    /// Heading depth, 1 for the document title.
    pub level: u8,
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub title: String,
    pub sections: Vec<Section>,
    pub outline: Vec<TocEntry>,
}

impl LoadedDocument {
    /// Builds a document whose table of contents lists every section.
    pub fn from_sections(title: String, sections: Vec<Section>) -> Self {
        let outline = sections
            .iter()
            .map(|section| TocEntry::new(section.id.clone(), section.title.clone()))
            .collect();
        Self {
            title,
            sections,
            outline,
        }
    }

    pub fn sample() -> Self {
        let extended = |body: &str| -> Vec<String> { vec![body.to_string(); 3] };
        let section = |id: &str, title: &str, lead: &str, body: &str| {
            let mut paragraphs = vec![lead.to_string()];
            paragraphs.extend(extended(body));
            Section {
                id: id.to_string(),
                title: title.to_string(),
                level: 2,
                paragraphs,
            }
        };

        let sections = vec![
            Section {
                id: "introduction".to_string(),
                title: "Design Guidelines".to_string(),
                level: 1,
                paragraphs: Vec::new(),
            },
            section(
                "visual-hierarchy",
                "1. Visual Hierarchy",
                "Using visual hierarchy principles such as size, color, and spacing guides users \
                 to essential actions and information. Important buttons should be easily \
                 noticeable, ensuring intuitive navigation.",
                "Extended content about visual hierarchy principles and their importance in \
                 design. This helps ensure we have enough content to demonstrate the scroll \
                 functionality.",
            ),
            section(
                "typography",
                "2. Typography",
                "Typography in web UI design is more than just choosing fonts. It's about \
                 creating hierarchy and rhythm that guides readers through content while \
                 considering web-safe fonts and accessibility.",
                "Detailed explanation of typography principles, font selection, and their \
                 impact on readability and user experience in web design.",
            ),
            section(
                "spacing",
                "3. Spacing and Layout",
                "Proper spacing and alignment enhance readability and make interfaces more \
                 intuitive. Consistent margins and padding create visual harmony.",
                "In-depth discussion of spacing principles, layout guidelines, and their role \
                 in creating balanced and harmonious user interfaces.",
            ),
            section(
                "color",
                "4. Color Theory",
                "Understanding color psychology and accessibility ensures your design is both \
                 aesthetically pleasing and functional for all users.",
                "Comprehensive exploration of color theory, accessibility considerations, and \
                 practical applications in modern web design.",
            ),
        ];

        let mut document = Self::from_sections("Design Guidelines".to_string(), sections);
        if let Some(first) = document.outline.first_mut() {
            first.title = "Introduction".to_string();
        }
        document
    }
}

/// Read a document from disk.
pub fn load_document(path: &Path) -> Result<LoadedDocument> {
    info!(path = %path.display(), "Loading document");
    let data =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let fallback_title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string());
    let document = parse_document(&data, &fallback_title);
    info!(
        sections = document.sections.len(),
        title = %document.title,
        "Finished loading document"
    );
    Ok(document)
}

pub fn parse_document(text: &str, fallback_title: &str) -> LoadedDocument {
    let mut builder = SectionBuilder::default();

    for line in text.lines() {
        if let Some(caps) = RE_HEADING.captures(line) {
            let level = caps["level"].len() as u8;
            let title = caps["title"].trim().to_string();
            let explicit = caps.name("id").map(|id| id.as_str().to_string());
            builder.start_section(level, title, explicit);
        } else if line.trim().is_empty() {
            builder.end_paragraph();
        } else {
            builder.push_line(line.trim(), fallback_title);
        }
    }

    let mut sections = builder.finish();
    if sections.is_empty() {
        warn!("Document has no text; showing placeholder");
        sections.push(Section {
            id: "top".to_string(),
            title: fallback_title.to_string(),
            level: 1,
            paragraphs: vec![EMPTY_DOCUMENT_TEXT.to_string()],
        });
    }

    let title = sections
        .iter()
        .find(|section| section.level == 1)
        .map(|section| section.title.clone())
        .unwrap_or_else(|| fallback_title.to_string());
    LoadedDocument::from_sections(title, sections)
}

/// Lowercase ASCII anchor id for a heading; accents are folded away.
pub fn slugify(title: &str) -> String {
    let folded: String = title
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect::<String>()
        .to_lowercase();
    let slug = RE_NON_SLUG.replace_all(&folded, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug.to_string()
    }
}

#[derive(Default)]
struct SectionBuilder {
    sections: Vec<Section>,
    current: Option<Section>,
    paragraph: Vec<String>,
    used_ids: HashSet<String>,
}

impl SectionBuilder {
    fn start_section(&mut self, level: u8, title: String, explicit_id: Option<String>) {
        self.flush_section();
        let base = explicit_id.unwrap_or_else(|| slugify(&title));
        let id = self.unique_id(base);
        debug!(%id, level, "Parsed section heading");
        self.current = Some(Section {
            id,
            title,
            level,
            paragraphs: Vec::new(),
        });
    }

    fn push_line(&mut self, line: &str, fallback_title: &str) {
        if self.current.is_none() {
            // Text ahead of the first heading gets its own leading section.
            let id = self.unique_id("top".to_string());
            self.current = Some(Section {
                id,
                title: fallback_title.to_string(),
                level: 1,
                paragraphs: Vec::new(),
            });
        }
        self.paragraph.push(line.to_string());
    }

    fn end_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let paragraph = self.paragraph.join(" ");
        self.paragraph.clear();
        if let Some(section) = self.current.as_mut() {
            section.paragraphs.push(paragraph);
        }
    }

    fn flush_section(&mut self) {
        self.end_paragraph();
        if let Some(section) = self.current.take() {
            self.sections.push(section);
        }
    }

    fn unique_id(&mut self, base: String) -> String {
        let mut candidate = base.clone();
        let mut suffix = 2usize;
        while !self.used_ids.insert(candidate.clone()) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        candidate
    }

    fn finish(mut self) -> Vec<Section> {
        self.flush_section();
        self.sections
    }
}

//! HTML report embedding generated statistics
//!
//! Each section holds the `(text, image)` pair a generator returns. Images
//! are referenced by file name, so the report is written next to them.

use crate::job_arrival::IMAGE_EXTENSION;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Content produced by one statistic generator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportContent {
    pub text: Option<String>,
    /// Image base name, without extension
    pub image: Option<String>,
}

impl From<(Option<String>, String)> for ReportContent {
    fn from((text, image): (Option<String>, String)) -> Self {
        Self {
            text,
            image: Some(image),
        }
    }
}

#[derive(Debug, Clone)]
struct Section {
    title: String,
    content: ReportContent,
}

/// HTML report for one workload
#[derive(Debug)]
pub struct HtmlReport {
    workload_name: String,
    sections: Vec<Section>,
}

impl HtmlReport {
    pub fn new(workload_name: impl Into<String>) -> Self {
        Self {
            workload_name: workload_name.into(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, title: impl Into<String>, content: ReportContent) {
        self.sections.push(Section {
            title: title.into(),
            content,
        });
    }

    /// File name of the report, e.g. `report_alibaba.html`
    pub fn file_name(&self) -> String {
        format!("report_{}.html", self.workload_name)
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        .section {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            padding: 12px 20px;
            margin-bottom: 20px;
        }
        .section img {
            max-width: 100%;
        }
        .text {
            white-space: pre-wrap;
            font-family: monospace;
            color: #555;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    fn render_section(section: &Section) -> String {
        let mut html = String::new();
        html.push_str("    <div class=\"section\">\n");
        html.push_str(&format!(
            "        <h2>{}</h2>\n",
            Self::escape_html(&section.title)
        ));

        if let Some(text) = &section.content.text {
            html.push_str(&format!(
                "        <p class=\"text\">{}</p>\n",
                Self::escape_html(text)
            ));
        }

        if let Some(image) = &section.content.image {
            let src = format!("{}.{}", image, IMAGE_EXTENSION);
            html.push_str(&format!(
                "        <img src=\"{}\" alt=\"{}\">\n",
                Self::escape_html(&src),
                Self::escape_html(&section.title)
            ));
        }

        html.push_str("    </div>\n");
        html
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!(
            "    <title>Workload Report: {}</title>\n",
            Self::escape_html(&self.workload_name)
        ));
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str(&format!(
            "    <h1>Workload {}</h1>\n",
            Self::escape_html(&self.workload_name)
        ));

        for section in &self.sections {
            html.push_str(&Self::render_section(section));
        }

        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by wta-stats\n");
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }

    /// Write the report into `folder`, returning the full path
    pub fn write_to<P: AsRef<Path>>(&self, folder: P) -> Result<PathBuf> {
        let path = folder.as_ref().join(self.file_name());
        fs::write(&path, self.to_html())
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Ok(path)
    }
}

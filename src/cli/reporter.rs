use colored::Colorize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tsr_common::{Diagnostic, DiagnosticCategory, TransformEvent, TransformObserver};

/// Renders diagnostics the way tsc does: `file:line:col - error TSnnnn: text`
/// followed by the offending line and a `~` underline.
///
/// Diagnostic file names are relative; sources are read from `root`.
pub struct Reporter {
    color: bool,
    root: PathBuf,
    sources: HashMap<String, String>,
}

impl Reporter {
    pub fn new(color: bool, root: impl Into<PathBuf>) -> Self {
        Reporter {
            color,
            root: root.into(),
            sources: HashMap::new(),
        }
    }

    /// Read later sources from `root`; sources read so far are forgotten.
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
        self.sources.clear();
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        match self.format_location(&diagnostic.file, diagnostic.start) {
            Some(location) => output.push_str(&location),
            None if !diagnostic.file.is_empty() => output.push_str(&diagnostic.file),
            None => output.push_str("<global>"),
        }

        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        let code = self.format_code(diagnostic.code);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) =
            self.format_snippet(&diagnostic.file, diagnostic.start, diagnostic.length)
        {
            output.push_str(&snippet);
        }
        output
    }

    fn format_snippet(&mut self, file: &str, start: u32, length: u32) -> Option<String> {
        if file.is_empty() || length == 0 {
            return None;
        }
        let (line_num, column) = self.position_for(file, start)?;
        let source = self.sources.get(file)?;
        let line_text = source.lines().nth(line_num as usize - 1)?;

        let first = column as usize - 1;
        let span = (length as usize).max(1);
        let mut underline = String::new();
        for (i, ch) in line_text.chars().enumerate() {
            let marker = if i < first {
                ' '
            } else if i < first + span {
                '~'
            } else {
                break;
            };
            if ch == '\t' {
                underline.extend(std::iter::repeat_n(marker, 4));
            } else {
                underline.push(marker);
            }
        }
        if !underline.contains('~') {
            underline.push('~');
        }

        let underline = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        Some(format!("\n  {line_num:>3}   {line_text}\n        {underline}"))
    }

    fn format_location(&mut self, file: &str, offset: u32) -> Option<String> {
        if file.is_empty() {
            return None;
        }
        let (line, column) = self.position_for(file, offset)?;
        let file = if self.color {
            file.cyan().to_string()
        } else {
            file.to_string()
        };
        Some(format!("{file}:{line}:{column}"))
    }

    /// One-based line and column (in characters) of a byte offset.
    fn position_for(&mut self, file: &str, offset: u32) -> Option<(u32, u32)> {
        self.ensure_source(file)?;
        let source = self.sources.get(file)?;
        Some(line_and_column(source, offset as usize))
    }

    fn ensure_source(&mut self, file: &str) -> Option<()> {
        if !self.sources.contains_key(file) {
            let contents = std::fs::read_to_string(self.root.join(file)).ok()?;
            self.sources.insert(file.to_string(), contents);
        }
        Some(())
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }
        let label = format!("TS{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

pub(crate) fn line_and_column(source: &str, offset: usize) -> (u32, u32) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &source[..offset];
    let line_start = before.rfind('\n').map_or(0, |pos| pos + 1);
    let line = before.matches('\n').count() as u32 + 1;
    let column = before[line_start..].chars().count() as u32 + 1;
    (line, column)
}

/// Prints run events and their diagnostics to `out`.
///
/// Diagnostics before the `Transform` event refer to the input program;
/// later ones refer to the rewritten copy in the temp workspace.
pub struct EventPrinter<W: Write> {
    out: W,
    reporter: Reporter,
    workspace: PathBuf,
    color: bool,
}

impl<W: Write> EventPrinter<W> {
    pub fn new(out: W, color: bool, base: &Path, temp_folder_name: &str) -> Self {
        EventPrinter {
            out,
            reporter: Reporter::new(color, base),
            workspace: base.join(temp_folder_name),
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn status(&self, text: &str, ok: bool) -> String {
        match (self.color, ok) {
            (false, _) => text.to_string(),
            (true, true) => text.green().bold().to_string(),
            (true, false) => text.red().bold().to_string(),
        }
    }

    fn write_event(&mut self, event: &TransformEvent) -> std::io::Result<()> {
        match event {
            TransformEvent::Start => writeln!(self.out, "Starting"),
            TransformEvent::Transform(files) => {
                self.reporter.set_root(self.workspace.clone());
                writeln!(self.out, "Transforming {} file(s)", files.len())?;
                for file in files {
                    writeln!(self.out, "  {}", file.display())?;
                }
                Ok(())
            }
            TransformEvent::Diagnostics { batch, total } => {
                let rendered = self.reporter.render(batch);
                writeln!(self.out, "{rendered}")?;
                if *total > batch.len() {
                    writeln!(self.out, "... and {} more", total - batch.len())?;
                }
                writeln!(self.out)?;
                let summary = self.status(&format!("Found {total} error(s)."), false);
                writeln!(self.out, "{summary}")
            }
            TransformEvent::Cleanup => writeln!(self.out, "Cleaning up"),
            TransformEvent::Stop => {
                let stopped = self.status("Stopped", false);
                writeln!(self.out, "{stopped}")
            }
            TransformEvent::End => {
                let done = self.status("Done", true);
                writeln!(self.out, "{done}")
            }
        }
    }
}

impl<W: Write> TransformObserver for EventPrinter<W> {
    fn notify(&mut self, event: &TransformEvent) {
        if let Err(err) = self.write_event(event) {
            tracing::warn!(event = event.name(), %err, "failed to print event");
        }
    }
}

// src/utils/pdf.rs

//! Renders a `SubmissionBreakdown` into a PDF performance report.
//!
//! Layout is deliberately plain: built-in Helvetica, A4 pages, simple bars.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;

use crate::{
    error::AppError,
    services::report::{SubjectBreakdown, SubmissionBreakdown},
};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 25.0;
const BOTTOM: f32 = 25.0;
const WRAP_CHARS: usize = 95;

const FOOTER: &str = "Generated by OMR Assessment System";

const SUBJECT_COLORS: [(f32, f32, f32); 8] = [
    (0.298, 0.686, 0.314), // green
    (0.129, 0.588, 0.953), // blue
    (1.0, 0.596, 0.0),     // orange
    (0.612, 0.153, 0.690), // purple
    (0.957, 0.263, 0.212), // red
    (0.0, 0.737, 0.831),   // cyan
    (0.475, 0.333, 0.282), // brown
    (0.376, 0.490, 0.545), // blue grey
];
const GREY: (f32, f32, f32) = (0.9, 0.9, 0.9);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

/// Builds the full report and returns the PDF bytes.
pub fn render_report(report: &SubmissionBreakdown) -> Result<Vec<u8>, AppError> {
    let (doc, page, layer) =
        PdfDocument::new("Student Performance Report", Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut w = Writer {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_H - MARGIN,
        regular,
        bold,
    };

    // Cover
    w.y = PAGE_H - 110.0;
    w.text_at("Student Performance Report", 26.0, MARGIN + 10.0, true);
    w.y -= 14.0;
    w.text_at("Confidential Academic Assessment", 14.0, MARGIN + 32.0, false);
    w.y -= 10.0;
    w.text_at(&report.student.name, 14.0, MARGIN + 32.0, true);
    w.new_page();

    // Student information
    w.heading("Student Information", 18.0);
    let date = report.submitted_at.format("%B %d, %Y").to_string();
    for (label, value) in [
        ("Student Name:", report.student.name.as_str()),
        ("Class:", report.student.class_level.as_str()),
        ("School:", report.student.school.as_str()),
        ("Report Date:", date.as_str()),
    ] {
        w.ensure_room(8.0);
        w.text_at(label, 11.0, MARGIN, true);
        w.text_at(value, 11.0, MARGIN + 35.0, false);
        w.y -= 8.0;
    }
    w.y -= 8.0;

    // Overall score bar
    w.heading("Overall Performance", 16.0);
    w.ensure_room(30.0);
    let bar_w = 110.0;
    let filled = bar_w * (report.percentage as f32 / 100.0).clamp(0.0, 1.0);
    let score_color = if report.percentage >= 75.0 {
        (0.298, 0.686, 0.314)
    } else if report.percentage >= 50.0 {
        (1.0, 0.757, 0.027)
    } else {
        (0.957, 0.263, 0.212)
    };
    w.rect(MARGIN, w.y - 10.0, bar_w, 10.0, (0.933, 0.933, 0.933));
    if filled > 0.0 {
        w.rect(MARGIN, w.y - 10.0, filled, 10.0, score_color);
    }
    w.text_at(
        &format!("{}%", report.percentage),
        12.0,
        MARGIN + bar_w + 5.0,
        true,
    );
    w.y -= 18.0;
    w.text_at(
        &format!("Score: {} out of {} questions", report.score, report.total),
        10.0,
        MARGIN,
        false,
    );
    w.y -= 10.0;
    w.paragraph(report.performance, 11.0);
    w.y -= 4.0;
    w.paragraph(
        "* Scores are calculated on the questions assigned to the student (max 5 per level).",
        9.0,
    );
    w.new_page();

    // Subject summary
    w.heading("Subject Performance Summary", 18.0);
    let cols = [MARGIN, MARGIN + 60.0, MARGIN + 95.0, MARGIN + 130.0];
    w.row(&cols, &["Subject", "Correct", "Total", "Percentage"], true);
    for s in &report.subjects {
        w.row(
            &cols,
            &[
                &s.subject_name,
                &s.correct.to_string(),
                &s.total.to_string(),
                &format!("{}%", s.percentage),
            ],
            false,
        );
    }

    // Per-subject level charts
    for (i, subject) in report.subjects.iter().enumerate() {
        w.new_page();
        subject_page(&mut w, subject, SUBJECT_COLORS[i % SUBJECT_COLORS.len()]);
    }

    w.footer();
    // The writer borrows `doc`; release it before saving consumes the document.
    drop(w);

    doc.save_to_bytes().map_err(AppError::from)
}

fn subject_page(w: &mut Writer<'_>, subject: &SubjectBreakdown, color: (f32, f32, f32)) {
    w.heading(&format!("{} Performance by Level", subject.subject_name), 16.0);

    // Bar chart: correct vs. total per level.
    let chart_h = 60.0;
    let max_total = subject.levels.iter().map(|l| l.total).max().unwrap_or(0);
    let scale_max = (max_total + 1).max(10) as f32;
    let base_y = w.y - chart_h - 5.0;
    let group_w = 35.0;

    w.rect(MARGIN, base_y, 4.0 * group_w, 0.3, BLACK);
    for (i, level) in subject.levels.iter().enumerate() {
        let x = MARGIN + 5.0 + i as f32 * group_w;
        let correct_h = chart_h * level.correct as f32 / scale_max;
        let total_h = chart_h * level.total as f32 / scale_max;
        if correct_h > 0.0 {
            w.rect(x, base_y, 10.0, correct_h, color);
        }
        if total_h > 0.0 {
            w.rect(x + 12.0, base_y, 10.0, total_h, GREY);
        }
        w.layer.use_text(
            format!("Level {}", level.level),
            9.0,
            Mm(x),
            Mm(base_y - 6.0),
            &w.regular,
        );
    }
    w.y = base_y - 12.0;
    w.text_at("Correct answers (colored) vs. total questions (grey)", 8.0, MARGIN, false);
    w.y -= 10.0;

    let cols = [MARGIN, MARGIN + 50.0, MARGIN + 72.0, MARGIN + 90.0, MARGIN + 115.0];
    w.row(&cols, &["Level", "Correct", "Total", "Percentage", "Performance"], true);
    for level in &subject.levels {
        w.row(
            &cols,
            &[
                &format!("{} (Level {})", level.label, level.level),
                &level.correct.to_string(),
                &level.total.to_string(),
                &format!("{}%", level.percentage),
                level.rating,
            ],
            false,
        );
    }
    w.y -= 6.0;

    w.ensure_room(8.0);
    w.text_at(&format!("{} Analysis:", subject.subject_name), 11.0, MARGIN, true);
    w.y -= 7.0;
    if !subject.strengths.is_empty() {
        w.paragraph(
            &format!(
                "Strengths: Demonstrated good understanding in {}.",
                subject.strengths.join(", ")
            ),
            10.0,
        );
    }
    if !subject.weaknesses.is_empty() {
        w.paragraph(
            &format!(
                "Areas for Improvement: Needs more practice in {}.",
                subject.weaknesses.join(", ")
            ),
            10.0,
        );
    }
}

/// Cursor over the current page.
struct Writer<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Writer<'_> {
    fn new_page(&mut self) {
        self.footer();
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_H - MARGIN;
    }

    fn footer(&self) {
        self.layer
            .use_text(FOOTER, 8.0, Mm(MARGIN), Mm(12.0), &self.regular);
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < BOTTOM {
            self.new_page();
        }
    }

    fn text_at(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(rgb(BLACK));
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn heading(&mut self, text: &str, size: f32) {
        self.ensure_room(size);
        self.text_at(text, size, MARGIN, true);
        self.y -= size * 0.6 + 6.0;
    }

    fn paragraph(&mut self, text: &str, size: f32) {
        let line_h = size * 0.5 + 1.5;
        for line in wrap(text, WRAP_CHARS) {
            self.ensure_room(line_h);
            self.text_at(&line, size, MARGIN, false);
            self.y -= line_h;
        }
    }

    fn row(&mut self, cols: &[f32], cells: &[&str], bold: bool) {
        self.ensure_room(7.0);
        for (x, cell) in cols.iter().zip(cells) {
            self.text_at(cell, 10.0, *x, bold);
        }
        self.y -= 7.0;
    }

    fn rect(&self, x: f32, y: f32, width: f32, height: f32, color: (f32, f32, f32)) {
        let points = vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + width), Mm(y)), false),
            (Point::new(Mm(x + width), Mm(y + height)), false),
            (Point::new(Mm(x), Mm(y + height)), false),
        ];
        self.layer.set_fill_color(rgb(color));
        self.layer.add_polygon(Polygon {
            rings: vec![points],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
        self.layer.set_fill_color(rgb(BLACK));
    }
}

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Greedy word wrap on character count.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::report::{LevelBreakdown, StudentSummary};

    fn sample_report() -> SubmissionBreakdown {
        let levels = (1..=4)
            .map(|level| LevelBreakdown {
                level,
                label: "Basic",
                correct: level - 1,
                total: 3,
                percentage: 33.33,
                rating: "Needs Improvement",
            })
            .collect();

        SubmissionBreakdown {
            submission_id: 1,
            student: StudentSummary {
                id: 1,
                name: "Asha Rao".to_string(),
                class_level: "10".to_string(),
                school: "Green Valley High".to_string(),
            },
            submitted_at: chrono::Utc::now(),
            score: 6,
            total: 12,
            percentage: 50.0,
            performance: "Satisfactory performance.",
            subjects: vec![SubjectBreakdown {
                subject_id: 1,
                subject_name: "Math".to_string(),
                correct: 6,
                total: 12,
                percentage: 50.0,
                levels,
                strengths: vec![],
                weaknesses: vec!["Level 1 (Basic)".to_string()],
            }],
        }
    }

    #[test]
    fn test_render_report_produces_pdf() {
        let bytes = render_report(&sample_report()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_wrap() {
        let lines = wrap("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
        assert!(wrap("", 10).is_empty());
    }
}

//! Minimal PDF writer for CV and cover-letter export.
//!
//! Emits a plain PDF 1.4 document by hand: one content stream per page,
//! the two standard Helvetica fonts (no embedding), WinAnsi encoding, and
//! an xref table built from byte offsets. Line breaking uses greedy
//! word-wrap over static character-width tables; widths are in em units
//! (thousandths of the font size, straight from the AFM files), covering
//! ASCII 0x20..=0x7E with an average-width fallback for anything else.

use super::flow::{Block, DocumentFlow};

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

/// US letter, points.
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const TEXT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 11.0;
const LEADING: f32 = 14.0;
/// Continuation lines of a bullet are indented under the marker.
const BULLET_INDENT: f32 = 12.0;

const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2.0 * MARGIN) / LEADING) as usize;

// ────────────────────────────────────────────────────────────────────────────
// Font metrics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    /// /F1 Helvetica
    Body,
    /// /F2 Helvetica-Bold
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Body => "/F1",
            Font::Bold => "/F2",
        }
    }
}

struct WidthTable {
    /// `widths[i]` = width of ASCII char `(i + 32)` in em units.
    widths: [f32; 95],
    average: f32,
}

impl WidthTable {
    /// Width of `s` in points at `size`.
    fn measure(&self, s: &str, size: f32) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average
                }
            })
            .sum::<f32>()
            * size
    }
}

/// Helvetica, AFM widths / 1000.
#[rustfmt::skip]
static HELVETICA: WidthTable = WidthTable {
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average: 0.513,
};

/// Helvetica-Bold, AFM widths / 1000.
#[rustfmt::skip]
static HELVETICA_BOLD: WidthTable = WidthTable {
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average: 0.550,
};

fn metrics(font: Font) -> &'static WidthTable {
    match font {
        Font::Body => &HELVETICA,
        Font::Bold => &HELVETICA_BOLD,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Line layout
// ────────────────────────────────────────────────────────────────────────────

/// One printed line. `text.is_empty()` marks vertical spacing.
#[derive(Debug, Clone)]
struct Line {
    font: Font,
    size: f32,
    indent: f32,
    text: String,
}

impl Line {
    fn blank() -> Self {
        Line {
            font: Font::Body,
            size: BODY_SIZE,
            indent: 0.0,
            text: String::new(),
        }
    }
}

/// Greedy word-wrap at `max_width` points. A word wider than the line goes
/// on its own line rather than being split mid-word.
fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let table = metrics(font);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if table.measure(&candidate, size) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn layout(flow: &DocumentFlow) -> Vec<Line> {
    let mut lines = Vec::new();

    lines.push(Line {
        font: Font::Bold,
        size: TITLE_SIZE,
        indent: 0.0,
        text: flow.title.clone(),
    });
    if !flow.contact_line.is_empty() {
        for text in wrap(&flow.contact_line, Font::Body, BODY_SIZE, TEXT_WIDTH) {
            lines.push(Line {
                font: Font::Body,
                size: BODY_SIZE,
                indent: 0.0,
                text,
            });
        }
    }
    lines.push(Line::blank());

    for section in &flow.sections {
        if !section.heading.is_empty() {
            lines.push(Line {
                font: Font::Bold,
                size: HEADING_SIZE,
                indent: 0.0,
                text: section.heading.clone(),
            });
        }
        for block in &section.blocks {
            match block {
                Block::Paragraph(text) => {
                    for text in wrap(text, Font::Body, BODY_SIZE, TEXT_WIDTH) {
                        lines.push(Line {
                            font: Font::Body,
                            size: BODY_SIZE,
                            indent: 0.0,
                            text,
                        });
                    }
                    if section.heading.is_empty() {
                        // Cover letter body keeps paragraph gaps.
                        lines.push(Line::blank());
                    }
                }
                Block::Bullet(text) => {
                    let wrapped =
                        wrap(text, Font::Body, BODY_SIZE, TEXT_WIDTH - BULLET_INDENT);
                    for (i, text) in wrapped.into_iter().enumerate() {
                        if i == 0 {
                            lines.push(Line {
                                font: Font::Body,
                                size: BODY_SIZE,
                                indent: 0.0,
                                text: format!("- {text}"),
                            });
                        } else {
                            lines.push(Line {
                                font: Font::Body,
                                size: BODY_SIZE,
                                indent: BULLET_INDENT,
                                text,
                            });
                        }
                    }
                }
            }
        }
        lines.push(Line::blank());
    }

    while lines.last().is_some_and(|l| l.text.is_empty()) {
        lines.pop();
    }
    lines
}

/// Splits the flat line list into pages, dropping spacing lines that would
/// land at the top of a page.
fn paginate(lines: Vec<Line>) -> Vec<Vec<Line>> {
    let mut pages: Vec<Vec<Line>> = Vec::new();
    let mut current: Vec<Line> = Vec::new();

    for line in lines {
        if current.len() >= LINES_PER_PAGE {
            pages.push(std::mem::take(&mut current));
        }
        if current.is_empty() && line.text.is_empty() {
            continue;
        }
        current.push(line);
    }
    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

// ────────────────────────────────────────────────────────────────────────────
// PDF emission
// ────────────────────────────────────────────────────────────────────────────

/// Escapes a line for a PDF literal string. Characters outside WinAnsi's
/// ASCII core are replaced rather than mis-encoded.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            c if (' '..='~').contains(&c) => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn content_stream(page: &[Line]) -> String {
    let mut ops = String::new();
    let mut y = PAGE_HEIGHT - MARGIN - LEADING;
    for line in page {
        if !line.text.is_empty() {
            ops.push_str(&format!(
                "BT {} {:.1} Tf 1 0 0 1 {:.1} {:.1} Tm ({}) Tj ET\n",
                line.font.resource(),
                line.size,
                MARGIN + line.indent,
                y,
                escape_text(&line.text)
            ));
        }
        y -= LEADING;
    }
    ops
}

/// Renders the flow to PDF bytes.
pub fn render(flow: &DocumentFlow) -> Vec<u8> {
    let pages = paginate(layout(flow));
    let page_count = pages.len();

    // Object layout: 1 catalog, 2 page tree, 3-4 fonts, then
    // (page, content) pairs.
    let page_object_id = |i: usize| 5 + 2 * i;
    let content_object_id = |i: usize| 6 + 2 * i;

    let kids = (0..page_count)
        .map(|i| format!("{} 0 R", page_object_id(i)))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>"),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    for (i, page) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            content_object_id(i)
        ));
        let stream = content_stream(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}endstream",
            stream.len()
        ));
    }

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

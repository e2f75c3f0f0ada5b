// src/report/layout.rs

/// A4 portrait, in PDF points.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 50.0;

const LINE_HEIGHT: f32 = 16.0;
const FOOTER_HEIGHT: f32 = 24.0;
const BODY_SIZE: f32 = 11.0;
const FOOTER_SIZE: f32 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

/// A single line of text placed at an absolute position (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub font: Font,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub runs: Vec<TextRun>,
}

impl Page {
    pub fn contains_text(&self, needle: &str) -> bool {
        self.runs.iter().any(|run| run.text.contains(needle))
    }
}

/// A laid out, paginated document, independent of the output format.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.pages.iter().any(|page| page.contains_text(needle))
    }
}

/// Flows content top to bottom and opens a new page whenever the next line
/// would run into the footer area.
pub struct DocumentBuilder {
    title: String,
    pages: Vec<Page>,
    current: Page,
    cursor_y: f32,
}

impl DocumentBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: Vec::new(),
            current: Page::default(),
            cursor_y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor_y - height < MARGIN + FOOTER_HEIGHT {
            self.break_page();
        }
    }

    pub fn break_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.cursor_y = PAGE_HEIGHT - MARGIN;
    }

    fn place(&mut self, x: f32, size: f32, font: Font, text: String) {
        self.current.runs.push(TextRun {
            x,
            y: self.cursor_y,
            size,
            font,
            text,
        });
    }

    pub fn heading(&mut self, text: &str, size: f32) {
        let height = size + 8.0;
        self.ensure_room(height);
        self.cursor_y -= size;
        self.place(MARGIN, size, Font::Bold, text.to_string());
        self.cursor_y -= 8.0;
    }

    /// Body paragraph, wrapped to the printable width.
    pub fn paragraph(&mut self, text: &str) {
        self.paragraph_styled(text, Font::Regular, MARGIN);
    }

    pub fn paragraph_styled(&mut self, text: &str, font: Font, x: f32) {
        let max_chars = chars_per_line(PAGE_WIDTH - MARGIN - x, BODY_SIZE);
        for line in wrap_text(text, max_chars) {
            self.ensure_room(LINE_HEIGHT);
            self.cursor_y -= LINE_HEIGHT;
            self.place(x, BODY_SIZE, font, line);
        }
    }

    /// One table row; each cell is `(x offset from the margin, text)`.
    pub fn row(&mut self, cells: &[(f32, String)], font: Font) {
        self.ensure_room(LINE_HEIGHT);
        self.cursor_y -= LINE_HEIGHT;
        for (offset, text) in cells {
            self.place(MARGIN + offset, BODY_SIZE, font, text.clone());
        }
    }

    pub fn spacer(&mut self, height: f32) {
        if self.cursor_y - height < MARGIN + FOOTER_HEIGHT {
            self.break_page();
        } else {
            self.cursor_y -= height;
        }
    }

    /// Closes the last page and stamps "Page n / N" on every page.
    pub fn finish(mut self) -> Document {
        if !self.current.runs.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }

        let total = self.pages.len();
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.runs.push(TextRun {
                x: PAGE_WIDTH - MARGIN - 60.0,
                y: MARGIN,
                size: FOOTER_SIZE,
                font: Font::Regular,
                text: format!("Page {} / {}", i + 1, total),
            });
        }

        Document {
            title: self.title,
            pages: self.pages,
        }
    }
}

/// Helvetica averages about half an em per glyph.
fn chars_per_line(width: f32, size: f32) -> usize {
    ((width / (size * 0.5)) as usize).max(1)
}

/// Characters of body text that fit in a column `width` points wide.
pub fn column_chars(width: f32) -> usize {
    chars_per_line(width, BODY_SIZE)
}

/// Greedy word wrap; words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let word: String = word.into_iter().collect();
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

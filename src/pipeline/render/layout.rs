use thiserror::Error;

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 72.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("font size must be a positive number, got {0}")]
    InvalidFontSize(f32),

    #[error("line height {0}pt does not fit on a page")]
    LineTooTall(f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Italic];

    pub const fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Italic => "F3",
        }
    }

    pub const fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Italic => "Helvetica-Oblique",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const BLUE: Color = Color { r: 0.0, g: 0.0, b: 0.8 };
    pub const GREY: Color = Color { r: 0.4, g: 0.4, b: 0.4 };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f32,
    pub leading: f32,
    pub color: Color,
    pub align: Align,
    pub indent: f32,
    pub space_after: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Paragraph { text: String, style: TextStyle },
    Spacer(f32),
    PageBreak,
    /// Moved to the next page as a unit when it would straddle a page break.
    KeepTogether(Vec<Block>),
}

impl Block {
    pub fn paragraph(text: impl Into<String>, style: &TextStyle) -> Self {
        Block::Paragraph {
            text: text.into(),
            style: style.clone(),
        }
    }
}

/// A single line of text at an absolute baseline position (PDF coordinates,
/// origin bottom-left).
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedText {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font: Font,
    pub size: f32,
    pub color: Color,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub items: Vec<PlacedText>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Draws page furniture (headers, footers) once the body has been laid out.
pub trait PageDecorator {
    fn decorate(&self, page_number: usize, page: &mut Page);
}

// Helvetica advance widths for printable ASCII, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {..~
];

fn char_width(c: char) -> u16 {
    let code = c as u32;
    if (32..127).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        556
    }
}

/// Approximate rendered width in points. Bold is widened so wrapping errs on the short side.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c) as u32).sum();
    let scale = if font == Font::Bold { 1.1 } else { 1.0 };
    units as f32 * size / 1000.0 * scale
}

/// Greedy word wrap. Words wider than the line are split by character.
pub fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut current = String::new();

        for word in raw_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width(&candidate, font, size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width(word, font, size) <= max_width {
                current = word.to_string();
            } else {
                for c in word.chars() {
                    current.push(c);
                    if text_width(&current, font, size) > max_width && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    }
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

fn block_height(block: &Block, content_width: f32) -> f32 {
    match block {
        Block::Paragraph { text, style } => {
            let lines = wrap_text(text, style.font, style.size, content_width - style.indent);
            lines.len() as f32 * style.leading + style.space_after
        }
        Block::Spacer(height) => *height,
        Block::PageBreak => 0.0,
        Block::KeepTogether(children) => children
            .iter()
            .map(|child| block_height(child, content_width))
            .sum(),
    }
}

/// Flows blocks onto fixed-size pages.
pub struct LayoutEngine {
    page_width: f32,
    page_height: f32,
    margin: f32,
    pages: Vec<Page>,
    current: Page,
    cursor: f32,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(PAGE_WIDTH, PAGE_HEIGHT, MARGIN)
    }
}

impl LayoutEngine {
    pub fn new(page_width: f32, page_height: f32, margin: f32) -> Self {
        Self {
            page_width,
            page_height,
            margin,
            pages: Vec::new(),
            current: Page::default(),
            cursor: page_height - margin,
        }
    }

    fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    fn remaining(&self) -> f32 {
        self.cursor - self.margin
    }

    fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.cursor = self.page_height - self.margin;
    }

    fn place(&mut self, block: &Block) -> Result<(), LayoutError> {
        match block {
            Block::Paragraph { text, style } => self.place_paragraph(text, style),
            Block::Spacer(height) => {
                if *height > self.remaining() {
                    self.new_page();
                } else if !self.current.is_empty() {
                    self.cursor -= height;
                }
                Ok(())
            }
            Block::PageBreak => {
                if !self.current.is_empty() {
                    self.new_page();
                }
                Ok(())
            }
            Block::KeepTogether(children) => {
                let height = block_height(block, self.content_width());
                if height > self.remaining() && !self.current.is_empty() {
                    self.new_page();
                }
                children.iter().try_for_each(|child| self.place(child))
            }
        }
    }

    fn place_paragraph(&mut self, text: &str, style: &TextStyle) -> Result<(), LayoutError> {
        if !(style.size.is_finite() && style.size > 0.0) {
            return Err(LayoutError::InvalidFontSize(style.size));
        }
        if style.leading > self.page_height - 2.0 * self.margin {
            return Err(LayoutError::LineTooTall(style.leading));
        }

        let available = self.content_width() - style.indent;
        for line in wrap_text(text, style.font, style.size, available) {
            if style.leading > self.remaining() {
                self.new_page();
            }

            let x = match style.align {
                Align::Left => self.margin + style.indent,
                Align::Center => {
                    let width = text_width(&line, style.font, style.size);
                    self.margin + style.indent + ((available - width) / 2.0).max(0.0)
                }
            };

            self.current.items.push(PlacedText {
                x,
                y: self.cursor - style.size,
                text: line,
                font: style.font,
                size: style.size,
                color: style.color,
            });
            self.cursor -= style.leading;
        }

        self.cursor -= style.space_after;
        Ok(())
    }

    /// Lays out every block and decorates the resulting pages.
    /// Always yields at least one page.
    pub fn layout(
        mut self,
        blocks: &[Block],
        decorator: &dyn PageDecorator,
    ) -> Result<Vec<Page>, LayoutError> {
        for block in blocks {
            self.place(block)?;
        }

        if !self.current.is_empty() || self.pages.is_empty() {
            self.new_page();
        }

        let mut pages = self.pages;
        for (index, page) in pages.iter_mut().enumerate() {
            decorator.decorate(index + 1, page);
        }
        Ok(pages)
    }
}

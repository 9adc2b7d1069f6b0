pub mod layout;
pub mod pdf;

use crate::errors::{AppError, AppResult};
use crate::models::domain::question::option_label;
use crate::models::domain::Question;
use crate::pipeline::sanitize::sanitize_text;

use layout::{Align, Block, Color, Font, LayoutEngine, Page, PageDecorator, PlacedText, TextStyle, PAGE_WIDTH};
use pdf::{write_pdf, DocumentInfo};

pub const BRANDING: &str = "Generated by QuizCraft";

struct Styles {
    title: TextStyle,
    heading: TextStyle,
    question: TextStyle,
    option: TextStyle,
    answer: TextStyle,
    explanation: TextStyle,
}

impl Styles {
    fn new() -> Self {
        let base = TextStyle {
            font: Font::Regular,
            size: 12.0,
            leading: 15.0,
            color: Color::BLACK,
            align: Align::Left,
            indent: 0.0,
            space_after: 0.0,
        };

        Styles {
            title: TextStyle {
                font: Font::Bold,
                size: 24.0,
                leading: 29.0,
                align: Align::Center,
                space_after: 24.0,
                ..base.clone()
            },
            heading: TextStyle {
                font: Font::Bold,
                size: 16.0,
                leading: 20.0,
                space_after: 12.0,
                ..base.clone()
            },
            question: TextStyle {
                font: Font::Bold,
                space_after: 4.0,
                ..base.clone()
            },
            option: TextStyle {
                size: 10.0,
                leading: 13.0,
                indent: 20.0,
                ..base.clone()
            },
            answer: TextStyle {
                font: Font::Bold,
                space_after: 2.0,
                ..base.clone()
            },
            explanation: TextStyle {
                font: Font::Italic,
                size: 10.0,
                leading: 13.0,
                color: Color::BLUE,
                indent: 20.0,
                ..base
            },
        }
    }
}

/// Centered page number plus branding line at the foot of every page.
pub struct QuizFooter;

impl PageDecorator for QuizFooter {
    fn decorate(&self, page_number: usize, page: &mut Page) {
        let centered = |text: String, y: f32, font: Font, size: f32, color: Color| {
            let width = layout::text_width(&text, font, size);
            PlacedText {
                x: (PAGE_WIDTH - width) / 2.0,
                y,
                text,
                font,
                size,
                color,
            }
        };

        page.items.push(centered(
            format!("Page {}", page_number),
            40.0,
            Font::Regular,
            9.0,
            Color::BLACK,
        ));
        page.items.push(centered(
            BRANDING.to_string(),
            28.0,
            Font::Italic,
            8.0,
            Color::GREY,
        ));
    }
}

/// Document structure: title, questions, forced break, answers.
/// Every string is sanitized before it reaches the layout engine.
pub fn build_blocks(title: &str, questions: &[Question]) -> Vec<Block> {
    let styles = Styles::new();
    let mut blocks = vec![
        Block::paragraph(sanitize_text(title), &styles.title),
        Block::paragraph("Questions", &styles.heading),
    ];

    for (i, question) in questions.iter().enumerate() {
        let mut group = vec![Block::paragraph(
            sanitize_text(&format!(
                "{}. [{}] {}",
                i + 1,
                question.question_type().label(),
                question.text
            )),
            &styles.question,
        )];

        if let Some(options) = question.options() {
            for (j, option) in options.iter().enumerate() {
                group.push(Block::paragraph(
                    format!("{}. {}", option_label(j), sanitize_text(option)),
                    &styles.option,
                ));
            }
        }
        group.push(Block::Spacer(10.0));
        blocks.push(Block::KeepTogether(group));
    }

    blocks.push(Block::PageBreak);
    blocks.push(Block::paragraph("Answers", &styles.heading));

    for (i, question) in questions.iter().enumerate() {
        let mut group = vec![Block::paragraph(
            sanitize_text(&format!("{}. Answer: {}", i + 1, question.answer)),
            &styles.answer,
        )];
        if let Some(explanation) = &question.explanation {
            group.push(Block::paragraph(
                sanitize_text(&format!("Explanation: {}", explanation)),
                &styles.explanation,
            ));
        }
        group.push(Block::Spacer(8.0));
        blocks.push(Block::KeepTogether(group));
    }

    blocks
}

pub fn layout_quiz(title: &str, questions: &[Question]) -> AppResult<Vec<Page>> {
    LayoutEngine::default()
        .layout(&build_blocks(title, questions), &QuizFooter)
        .map_err(|e| {
            log::error!("Quiz layout failed: {}", e);
            AppError::RenderFailure(e.to_string())
        })
}

/// Renders a quiz to PDF bytes. Never returns a partial document.
pub fn render_quiz_pdf(title: &str, questions: &[Question]) -> AppResult<Vec<u8>> {
    let pages = layout_quiz(title, questions)?;
    let info = DocumentInfo {
        title: sanitize_text(title),
        author: "QuizCraft".to_string(),
        subject: "Generated Quiz".to_string(),
    };

    write_pdf(&pages, &info).map_err(|e| {
        log::error!("PDF serialization failed: {}", e);
        AppError::RenderFailure(e)
    })
}

//! Paginated transcript layout
//!
//! All positions are millimetres from the top-left corner of an A4 page.

use crate::types::Chat;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_X_MM: f32 = 10.0;
pub const TITLE_Y_MM: f32 = 10.0;
pub const TITLE_FONT_SIZE: f32 = 16.0;
pub const BODY_FONT_SIZE: f32 = 12.0;
pub const BODY_TOP_MM: f32 = 20.0;
pub const LINE_HEIGHT_MM: f32 = 7.0;
/// Lines are never placed below this baseline
pub const PAGE_BREAK_MM: f32 = 280.0;
/// Characters per wrapped line (about 180mm of 12pt Helvetica)
pub const WRAP_COLUMNS: usize = 90;

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x_mm: f32,
    pub y_mm: f32,
    pub font_size: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub pages: Vec<Page>,
}

/// Lay out `chat` as "ROLE: content" paragraphs under the title
pub fn layout(chat: &Chat) -> Document {
    let mut pages = vec![Page::default()];
    pages[0].lines.push(TextLine {
        x_mm: MARGIN_X_MM,
        y_mm: TITLE_Y_MM,
        font_size: TITLE_FONT_SIZE,
        text: chat.title.clone(),
    });

    let mut y = BODY_TOP_MM;
    for message in &chat.messages {
        let paragraph = format!("{}: {}", message.role.label(), message.content);
        for text in wrap(&paragraph, WRAP_COLUMNS) {
            if y > PAGE_BREAK_MM {
                pages.push(Page::default());
                y = BODY_TOP_MM;
            }
            if let Some(page) = pages.last_mut() {
                page.lines.push(TextLine {
                    x_mm: MARGIN_X_MM,
                    y_mm: y,
                    font_size: BODY_FONT_SIZE,
                    text,
                });
            }
            y += LINE_HEIGHT_MM;
        }
    }

    Document { pages }
}

/// Greedy word wrap at `width` characters.
///
/// Explicit newlines are kept as line breaks (blank lines included), and
/// words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw_line in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in raw_line.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();

            // Oversized words are cut into full-width pieces
            while chars.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = chars.split_off(width);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }

            let word_len = chars.len();
            if current_len > 0 && current_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(chars);
            current_len += word_len;
        }

        lines.push(current);
    }

    lines
}

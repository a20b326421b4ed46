//! PDF serialization of laid-out transcripts
//!
//! Emits one Helvetica text object per line. Output depends only on the
//! document, the title and the timestamp.

use super::document::{Document, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use chrono::{DateTime, Datelike, Timelike, Utc};
use pdf_writer::{Content, Date, Name, Pdf, Rect, Ref, Str, TextStr};

const POINTS_PER_MM: f32 = 72.0 / 25.4;
const FONT_NAME: Name<'static> = Name(b"F1");

/// Serialize `document` as PDF bytes
pub fn render(document: &Document, title: &str, created_at: DateTime<Utc>) -> Vec<u8> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let tree_id = alloc.bump();
    let font_id = alloc.bump();
    let info_id = alloc.bump();
    // Each page takes two objects: the page dictionary and its content stream
    let page_ids: Vec<(Ref, Ref)> = document
        .pages
        .iter()
        .map(|_| (alloc.bump(), alloc.bump()))
        .collect();

    let width_pt = PAGE_WIDTH_MM * POINTS_PER_MM;
    let height_pt = PAGE_HEIGHT_MM * POINTS_PER_MM;

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(i32::try_from(page_ids.len()).unwrap_or(i32::MAX));
    pdf.type1_font(font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr("chatdeck"))
        .creation_date(creation_date(created_at));

    for (page, (page_id, content_id)) in document.pages.iter().zip(&page_ids) {
        let mut content = Content::new();
        for line in &page.lines {
            let text = win_ansi(&line.text);
            content
                .begin_text()
                .set_font(FONT_NAME, line.font_size)
                .next_line(
                    line.x_mm * POINTS_PER_MM,
                    height_pt - line.y_mm * POINTS_PER_MM,
                )
                .show(Str(&text))
                .end_text();
        }
        pdf.stream(*content_id, &content.finish());

        let mut page_writer = pdf.page(*page_id);
        page_writer
            .media_box(Rect::new(0.0, 0.0, width_pt, height_pt))
            .parent(tree_id)
            .contents(*content_id);
        page_writer.resources().fonts().pair(FONT_NAME, font_id);
    }

    pdf.finish()
}

fn creation_date(at: DateTime<Utc>) -> Date {
    let part = |n: u32| u8::try_from(n).unwrap_or_default();
    Date::new(u16::try_from(at.year()).unwrap_or_default())
        .month(part(at.month()))
        .day(part(at.day()))
        .hour(part(at.hour()))
        .minute(part(at.minute()))
        .second(part(at.second()))
        .utc_offset_hour(0)
}

/// Encode text for the `WinAnsiEncoding` base font.
///
/// Latin-1 characters map to their byte (the two encodings agree there);
/// anything outside it becomes `?` and control characters become spaces.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            if c.is_control() {
                b' '
            } else {
                u8::try_from(u32::from(c)).unwrap_or(b'?')
            }
        })
        .collect()
}

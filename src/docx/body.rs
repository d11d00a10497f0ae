//! Paragraph reader for the main document part.
//!
//! Yields every `w:p` inside `w:body` in the order paragraphs start, which
//! includes paragraphs in table cells, content controls and text boxes. A
//! paragraph's text and drawings include those of any paragraph nested
//! inside it.

use crate::error::{Error, Result};
use crate::model::{DrawingRef, Paragraph};
use quick_xml::events::{BytesStart, Event};

/// A paragraph whose element is still open.
struct OpenParagraph {
    index: usize,
    level: usize,
    in_ppr: bool,
}

/// A drawing whose element is still open, with the slot it occupies in each
/// enclosing paragraph.
struct OpenDrawing {
    slots: Vec<(usize, usize)>,
}

/// Read the paragraphs of a main document part.
pub fn read_paragraphs(xml: &str) -> Result<Vec<Paragraph>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    // Keep whitespace from xml:space="preserve" text
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();
    let mut paragraphs: Vec<Paragraph> = Vec::new();
    let mut open: Vec<OpenParagraph> = Vec::new();
    let mut drawings: Vec<OpenDrawing> = Vec::new();
    let mut depth = 0usize;
    let mut in_body = false;
    let mut text_depth = 0usize;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let level = depth;
                match e.name().as_ref() {
                    b"w:body" => in_body = true,
                    // Fallback markup repeats the preferred choice
                    b"mc:Fallback" => {
                        reader
                            .read_to_end_into(e.name(), &mut skip_buf)
                            .map_err(xml_error)?;
                        skip_buf.clear();
                        continue;
                    }
                    b"w:p" if in_body => {
                        paragraphs.push(Paragraph::new());
                        open.push(OpenParagraph {
                            index: paragraphs.len() - 1,
                            level,
                            in_ppr: false,
                        });
                    }
                    b"w:pPr" => {
                        if let Some(top) = open.last_mut() {
                            if level == top.level + 1 {
                                top.in_ppr = true;
                            }
                        }
                    }
                    b"w:pStyle" => apply_style(&mut paragraphs, &open, level, e),
                    b"w:t" if !open.is_empty() => text_depth += 1,
                    b"w:drawing" if !open.is_empty() => {
                        drawings.push(start_drawing(&mut paragraphs, &open));
                    }
                    _ => {
                        if e.local_name().as_ref() == b"blip" {
                            attach_blip(&mut paragraphs, &drawings, e);
                        }
                    }
                }
                depth += 1;
            }
            Ok(Event::Empty(ref e)) => {
                let level = depth;
                match e.name().as_ref() {
                    b"w:pStyle" => apply_style(&mut paragraphs, &open, level, e),
                    b"w:p" if in_body => paragraphs.push(Paragraph::new()),
                    b"w:drawing" if !open.is_empty() => {
                        start_drawing(&mut paragraphs, &open);
                    }
                    _ => {
                        if e.local_name().as_ref() == b"blip" {
                            attach_blip(&mut paragraphs, &drawings, e);
                        }
                    }
                }
            }
            Ok(Event::Text(ref e)) if text_depth > 0 => {
                let text = e.unescape().map_err(xml_error)?;
                append_text(&mut paragraphs, &open, &text);
            }
            Ok(Event::CData(ref e)) if text_depth > 0 => {
                let text = String::from_utf8_lossy(e).into_owned();
                append_text(&mut paragraphs, &open, &text);
            }
            Ok(Event::End(ref e)) => {
                depth = depth.saturating_sub(1);
                let level = depth;
                match e.name().as_ref() {
                    b"w:body" => in_body = false,
                    b"w:p" => {
                        if open.last().is_some_and(|top| top.level == level) {
                            open.pop();
                        }
                    }
                    b"w:pPr" => {
                        if let Some(top) = open.last_mut() {
                            if level == top.level + 1 {
                                top.in_ppr = false;
                            }
                        }
                    }
                    b"w:t" => text_depth = text_depth.saturating_sub(1),
                    b"w:drawing" => {
                        drawings.pop();
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
    }

    log::debug!("document body: {} paragraphs", paragraphs.len());
    Ok(paragraphs)
}

/// Set the style of the innermost open paragraph from a `w:pStyle` that is
/// a direct child of its own `w:pPr`.
fn apply_style(
    paragraphs: &mut [Paragraph],
    open: &[OpenParagraph],
    level: usize,
    e: &BytesStart,
) {
    if let Some(top) = open.last() {
        if top.in_ppr && level == top.level + 2 {
            paragraphs[top.index].style_id = get_attr(e, b"w:val");
        }
    }
}

/// Register a new drawing in every open paragraph.
fn start_drawing(paragraphs: &mut [Paragraph], open: &[OpenParagraph]) -> OpenDrawing {
    let slots = open
        .iter()
        .map(|frame| {
            let drawings = &mut paragraphs[frame.index].drawings;
            drawings.push(DrawingRef::default());
            (frame.index, drawings.len() - 1)
        })
        .collect();
    OpenDrawing { slots }
}

/// Record the first blip reference of the innermost open drawing.
fn attach_blip(paragraphs: &mut [Paragraph], drawings: &[OpenDrawing], e: &BytesStart) {
    let Some(drawing) = drawings.last() else {
        return;
    };
    let Some(embed) = e
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"embed")
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
    else {
        return;
    };

    for &(para, slot) in &drawing.slots {
        let target = &mut paragraphs[para].drawings[slot];
        if target.embed.is_none() {
            target.embed = Some(embed.clone());
        }
    }
}

fn append_text(paragraphs: &mut [Paragraph], open: &[OpenParagraph], text: &str) {
    for frame in open {
        paragraphs[frame.index].text.push_str(text);
    }
}

fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

fn xml_error(e: quick_xml::Error) -> Error {
    Error::MalformedPackage(format!("document part: {}", e))
}

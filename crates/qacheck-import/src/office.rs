//! Word and PowerPoint documents: zip archives of XML parts.

use std::collections::HashMap;
use std::io::{Read, Seek};

use color_eyre::eyre::eyre;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use qacheck_core::Result;
use zip::result::ZipError;
use zip::ZipArchive;

const DOCX_BODY: &str = "word/document.xml";
const PPTX_PRESENTATION: &str = "ppt/presentation.xml";
const PPTX_RELS: &str = "ppt/_rels/presentation.xml.rels";

enum Node<'a> {
    Open(&'a [u8]),
    Close(&'a [u8]),
    Empty(&'a [u8]),
    Text(&'a str),
}

/// Stream `xml`, handing each node to `visit` together with the path of
/// enclosing element names. For `Open` and `Close` the path ends with the
/// element itself, for `Empty` it ends with its parent.
fn walk(xml: &str, mut visit: impl FnMut(Node<'_>, &[Vec<u8>])) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut path: Vec<Vec<u8>> = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                path.push(e.name().as_ref().to_vec());
                visit(Node::Open(e.name().as_ref()), &path);
            }
            Event::End(e) => {
                visit(Node::Close(e.name().as_ref()), &path);
                path.pop();
            }
            Event::Empty(e) => visit(Node::Empty(e.name().as_ref()), &path),
            Event::Text(t) => {
                let text = t.unescape()?;
                visit(Node::Text(&text), &path);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

fn ends_with(path: &[Vec<u8>], tail: &[&[u8]]) -> bool {
    path.len() >= tail.len()
        && path[path.len() - tail.len()..]
            .iter()
            .zip(tail)
            .all(|(a, b)| a.as_slice() == *b)
}

fn read_part<R: Read + Seek>(zip: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut entry = match zip.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(Some(xml))
}

/// Non-blank body paragraphs of a `.docx`, in document order.
pub(crate) fn docx_paragraphs<R: Read + Seek>(reader: R) -> Result<Vec<String>> {
    let mut zip = ZipArchive::new(reader)?;
    let xml = read_part(&mut zip, DOCX_BODY)?
        .ok_or_else(|| eyre!("not a Word document: {DOCX_BODY} is missing"))?;
    body_paragraphs(&xml)
}

fn in_docx_run(path: &[Vec<u8>]) -> bool {
    ends_with(path, &[b"w:body", b"w:p", b"w:r"])
        || ends_with(path, &[b"w:body", b"w:p", b"w:hyperlink", b"w:r"])
}

/// Only direct body paragraphs count; table cells and text boxes are
/// separate flows.
fn body_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();
    let mut current = String::new();
    walk(xml, |node, path| match node {
        Node::Open(b"w:p") if ends_with(path, &[b"w:body", b"w:p"]) => current.clear(),
        Node::Close(b"w:p") if ends_with(path, &[b"w:body", b"w:p"]) => {
            if !current.trim().is_empty() {
                out.push(std::mem::take(&mut current));
            }
        }
        Node::Text(t) if ends_with(path, &[b"w:t"]) && in_docx_run(&path[..path.len() - 1]) => {
            current.push_str(t)
        }
        Node::Empty(b"w:tab") if in_docx_run(path) => current.push('\t'),
        Node::Empty(b"w:br" | b"w:cr") if in_docx_run(path) => current.push('\n'),
        _ => {}
    })?;
    Ok(out)
}

/// Text of every top-level shape that has some, slide by slide.
/// Paragraphs inside a shape are joined with `\n`, soft line breaks
/// become `\u{b}`.
pub(crate) fn pptx_shape_texts<R: Read + Seek>(reader: R) -> Result<Vec<String>> {
    let mut zip = ZipArchive::new(reader)?;
    let mut out = Vec::new();
    for slide in slide_parts(&mut zip)? {
        let xml = read_part(&mut zip, &slide)?
            .ok_or_else(|| eyre!("presentation lists {slide} but the part is missing"))?;
        out.extend(slide_shape_texts(&xml)?);
    }
    Ok(out)
}

fn attr(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    Ok(match e.try_get_attribute(name)? {
        Some(a) => Some(a.unescape_value()?.into_owned()),
        None => None,
    })
}

/// Slide part names in presentation order. Falls back to numeric
/// `slideN.xml` order when the presentation part has no slide list.
fn slide_parts<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<Vec<String>> {
    let (Some(pres), Some(rels)) = (
        read_part(zip, PPTX_PRESENTATION)?,
        read_part(zip, PPTX_RELS)?,
    ) else {
        return Ok(numbered_slides(zip));
    };

    let mut targets = HashMap::new();
    let mut reader = Reader::from_str(&rels);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attr(&e, "Id")?, attr(&e, "Target")?) {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let mut slides = Vec::new();
    let mut reader = Reader::from_str(&pres);
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"p:sldId" => {
                let target = attr(&e, "r:id")?.and_then(|id| targets.get(&id).cloned());
                if let Some(target) = target {
                    slides.push(match target.strip_prefix('/') {
                        Some(abs) => abs.to_string(),
                        None => format!("ppt/{target}"),
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    if slides.is_empty() {
        return Ok(numbered_slides(zip));
    }
    Ok(slides)
}

fn numbered_slides<R: Read + Seek>(zip: &ZipArchive<R>) -> Vec<String> {
    let mut numbered: Vec<(u32, String)> = zip
        .file_names()
        .filter_map(|name| {
            let n = name
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?
                .parse()
                .ok()?;
            Some((n, name.to_string()))
        })
        .collect();
    numbered.sort();
    numbered.into_iter().map(|(_, name)| name).collect()
}

const SHAPE: &[&[u8]] = &[b"p:spTree", b"p:sp"];
const SHAPE_BODY: &[&[u8]] = &[b"p:spTree", b"p:sp", b"p:txBody"];
const SHAPE_PARA: &[&[u8]] = &[b"p:spTree", b"p:sp", b"p:txBody", b"a:p"];

fn new_paragraph(text: &mut String, paragraphs: &mut usize) {
    if *paragraphs > 0 {
        text.push('\n');
    }
    *paragraphs += 1;
}

fn slide_shape_texts(xml: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();
    let mut text = String::new();
    let mut paragraphs = 0usize;
    walk(xml, |node, path| match node {
        Node::Open(b"p:sp") if ends_with(path, SHAPE) => {
            text.clear();
            paragraphs = 0;
        }
        Node::Close(b"p:sp") if ends_with(path, SHAPE) => {
            if !text.trim().is_empty() {
                out.push(std::mem::take(&mut text));
            }
        }
        Node::Open(b"a:p") if ends_with(path, SHAPE_PARA) => {
            new_paragraph(&mut text, &mut paragraphs)
        }
        Node::Empty(b"a:p") if ends_with(path, SHAPE_BODY) => {
            new_paragraph(&mut text, &mut paragraphs)
        }
        Node::Empty(b"a:br") if ends_with(path, SHAPE_PARA) => text.push('\u{b}'),
        Node::Text(t)
            if ends_with(path, &[b"a:p", b"a:r", b"a:t"]) || ends_with(path, &[b"a:p", b"a:fld", b"a:t"]) =>
        {
            if ends_with(&path[..path.len() - 2], SHAPE_PARA) {
                text.push_str(t);
            }
        }
        _ => {}
    })?;
    Ok(out)
}

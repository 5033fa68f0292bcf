use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::extraction::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound on the decompressed main document part.
const MAX_DOCUMENT_BYTES: u64 = 32 * 1024 * 1024;

/// Body text of a .docx: run text in document order, one line per paragraph.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let part = archive.by_name(DOCUMENT_PART).map_err(|e| match e {
        zip::result::ZipError::FileNotFound => ExtractError::MissingPart(DOCUMENT_PART),
        other => ExtractError::Zip(other),
    })?;

    let mut xml = String::new();
    part.take(MAX_DOCUMENT_BYTES).read_to_string(&mut xml)?;
    document_text(&xml)
}

fn document_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run = false;
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" => in_run_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            // `w:tab` also declares tab stops under `w:pPr`; only run-level ones are text.
            Event::Empty(e) if in_run => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_run_text => {
                let chunk = e
                    .decode()
                    .map_err(|err| ExtractError::Encoding(err.to_string()))?;
                text.push_str(&chunk);
            }
            Event::GeneralRef(r) if in_run_text => {
                let name = r
                    .decode()
                    .map_err(|err| ExtractError::Encoding(err.to_string()))?;
                push_reference(&mut text, &name);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

/// Resolves `&name;` references: numeric character references and the five
/// predefined XML entities. Anything else is dropped.
fn push_reference(out: &mut String, name: &str) {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => number.parse::<u32>().ok(),
        };
        if let Some(c) = code.and_then(char::from_u32) {
            out.push(c);
        }
        return;
    }
    let resolved = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => "",
    };
    out.push_str(resolved);
}

/// Builds a minimal .docx around the given `w:body` XML.
#[cfg(test)]
pub(crate) fn build_docx_from_body(body_xml: &str) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body_xml}</w:body></w:document>"#
    );
    let content_types = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("[Content_Types].xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(content_types.as_bytes()).unwrap();
    writer
        .start_file(DOCUMENT_PART, SimpleFileOptions::default())
        .unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// Builds a .docx with one plain paragraph per entry.
#[cfg(test)]
pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| {
            format!(
                r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                quick_xml::escape::escape(*p)
            )
        })
        .collect();
    build_docx_from_body(&body)
}

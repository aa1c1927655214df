//! Text extraction for office documents (.xlsx/.xls, .docx, .pptx),
//! producing the markdown-flavored plain text the session paginates.

use calamine::{open_workbook_auto, Data, Reader};
use std::io::{BufReader, Read};
use std::path::Path;
use websurfer_core::{Error, Result};

/// Extensions the office reader handles.
pub fn is_office_file(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(ext.to_lowercase().as_str(), "xlsx" | "xls" | "docx" | "pptx"),
        None => false,
    }
}

/// Convert an office file to text. Dispatches on extension.
pub fn read_office_file(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("xlsx") | Some("xls") => read_workbook(path),
        Some("docx") => read_docx(path),
        Some("pptx") => read_pptx(path),
        _ => Err(Error::Fetch(format!(
            "Unsupported office file format: {}",
            path.display()
        ))),
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if *f == (*f as i64) as f64 {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => format!("{}", b),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{:?}", e),
    }
}

/// Render each worksheet as a markdown table under a `## Sheet:` heading.
fn read_workbook(path: &Path) -> Result<String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| Error::Fetch(format!("Failed to open workbook: {}", e)))?;

    let mut output = String::new();
    for (idx, name) in workbook.sheet_names().to_vec().iter().enumerate() {
        if idx > 0 {
            output.push_str("\n\n");
        }
        output.push_str(&format!("## Sheet: {}\n\n", name));

        let range = match workbook.worksheet_range(name) {
            Ok(r) => r,
            Err(_) => continue,
        };

        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();
        if rows.is_empty() {
            continue;
        }

        // First row doubles as the table header.
        let col_count = rows[0].len();
        output.push_str(&format!("| {} |\n", rows[0].join(" | ")));
        output.push('|');
        for _ in 0..col_count {
            output.push_str(" --- |");
        }
        output.push('\n');
        for row in &rows[1..] {
            output.push_str(&format!("| {} |\n", row.join(" | ")));
        }
    }

    Ok(output)
}

/// Read a .docx: the body text lives in `word/document.xml` as `w:t` nodes.
fn read_docx(path: &Path) -> Result<String> {
    let xml = read_zip_entry(path, "word/document.xml")?;
    collect_xml_text(&xml, "w:t", "w:p")
}

/// Read a .pptx: one `ppt/slides/slideN.xml` per slide, `a:t` text nodes.
fn read_pptx(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::Fetch(format!("Failed to open pptx: {}", e)))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| Error::Fetch(format!("Failed to read pptx as ZIP: {}", e)))?;

    let mut slide_names: Vec<String> = Vec::new();
    for i in 0..archive.len() {
        if let Ok(entry) = archive.by_index(i) {
            let name = entry.name().to_string();
            if name.starts_with("ppt/slides/slide") && name.ends_with(".xml") {
                slide_names.push(name);
            }
        }
    }
    slide_names.sort();

    let mut output = String::new();
    for (idx, slide_name) in slide_names.iter().enumerate() {
        if idx > 0 {
            output.push_str("\n\n");
        }
        output.push_str(&format!("## Slide {}\n\n", idx + 1));

        let mut xml = String::new();
        archive
            .by_name(slide_name)
            .map_err(|e| Error::Fetch(format!("Failed to read {}: {}", slide_name, e)))?
            .read_to_string(&mut xml)
            .map_err(|e| Error::Fetch(format!("Failed to read slide XML: {}", e)))?;

        match collect_xml_text(&xml, "a:t", "a:p") {
            Ok(text) => output.push_str(&text),
            Err(_) => output.push_str("(unable to extract text)"),
        }
    }

    Ok(output)
}

fn read_zip_entry(path: &Path, entry: &str) -> Result<String> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::Fetch(format!("Failed to open {}: {}", path.display(), e)))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| Error::Fetch(format!("Failed to read {} as ZIP: {}", path.display(), e)))?;
    let mut content = String::new();
    archive
        .by_name(entry)
        .map_err(|e| Error::Fetch(format!("Missing {} in archive: {}", entry, e)))?
        .read_to_string(&mut content)
        .map_err(|e| Error::Fetch(format!("Failed to read {}: {}", entry, e)))?;
    Ok(content)
}

/// Collect the text under `text_tag` nodes, flushing a line per `para_tag`.
fn collect_xml_text(xml: &str, text_tag: &str, para_tag: &str) -> Result<String> {
    use quick_xml::events::Event;
    use quick_xml::reader::Reader;

    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut output = String::new();
    let mut paragraph = String::new();
    let mut inside_text = false;
    let mut buf = Vec::new();

    let mut flush = |output: &mut String, paragraph: &mut String| {
        let trimmed = paragraph.trim();
        if !trimmed.is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(trimmed);
        }
        paragraph.clear();
    };

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == text_tag.as_bytes() {
                    inside_text = true;
                }
            }
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == text_tag.as_bytes() {
                    inside_text = false;
                } else if e.name().as_ref() == para_tag.as_bytes() {
                    flush(&mut output, &mut paragraph);
                }
            }
            Ok(Event::Text(ref e)) => {
                if inside_text {
                    if let Ok(text) = e.unescape() {
                        paragraph.push_str(&text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Fetch(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    flush(&mut output, &mut paragraph);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_office_file() {
        assert!(is_office_file(Path::new("report.xlsx")));
        assert!(is_office_file(Path::new("slides.PPTX")));
        assert!(is_office_file(Path::new("doc.docx")));
        assert!(!is_office_file(Path::new("notes.txt")));
        assert!(!is_office_file(Path::new("paper.pdf")));
        assert!(!is_office_file(Path::new("noext")));
    }

    #[test]
    fn test_read_office_file_unsupported() {
        assert!(read_office_file(Path::new("/tmp/file.rtf")).is_err());
    }

    #[test]
    fn test_read_office_file_missing() {
        assert!(read_office_file(Path::new("/tmp/definitely-missing.xlsx")).is_err());
    }

    #[test]
    fn test_collect_xml_text_paragraphs() {
        let xml = "<w:document><w:p><w:r><w:t>first</w:t></w:r><w:r><w:t> line</w:t></w:r></w:p>\
                   <w:p><w:r><w:t>second</w:t></w:r></w:p></w:document>";
        let text = collect_xml_text(xml, "w:t", "w:p").unwrap();
        assert_eq!(text, "first line\nsecond");
    }
}

//! Fixture builders shared by the integration tests.
//!
//! Text fixtures are checked in under `tests/fixtures/`; binary fixtures
//! (PDF, XLSX, ZIP) are generated on the fly.

#![allow(dead_code, clippy::unwrap_used, clippy::non_ascii_literal)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use zip::write::{SimpleFileOptions, ZipWriter};

pub const REGION: &str = "Краснодарский край";

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

pub fn fixture_bytes(relative: &str) -> Vec<u8> {
    std::fs::read(fixtures_dir().join(relative)).unwrap()
}

/// A PDF with one line of text per page.
pub fn build_pdf(page_texts: &[String]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 11.into()]),
                Operation::new("Td", vec![50.into(), 780.into()]),
                Operation::new("Tj", vec![Object::string_literal(text.as_str())]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Stand-in for the JUnit user guide: 166 pages, numbered in their text.
pub fn build_user_guide_pdf() -> Vec<u8> {
    let pages: Vec<String> = (1..=166)
        .map(|n| format!("JUnit 5 User Guide, page {n}"))
        .collect();
    build_pdf(&pages)
}

/// Workbook whose first sheet has the region name at A2.
pub fn build_region_workbook() -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Регион").unwrap();
    sheet.write_string(0, 1, "Код").unwrap();
    sheet.write_string(1, 0, REGION).unwrap();
    sheet.write_number(1, 1, 23).unwrap();
    workbook.save_to_buffer().unwrap()
}

/// A ZIP archive; names ending in `/` become directory entries.
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
        } else {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// `sample.zip`: a single `sample.txt` entry.
pub fn build_sample_zip() -> Vec<u8> {
    build_zip(&[("sample.txt", fixture_bytes("txt/sample.txt").as_slice())])
}

/// Write the complete reference fixture set into `dir`.
pub fn write_reference_set(dir: &Path) {
    std::fs::write(dir.join("junit-user-guide-5.8.2.pdf"), build_user_guide_pdf()).unwrap();
    std::fs::write(dir.join("example.xlsx"), build_region_workbook()).unwrap();
    std::fs::write(dir.join("student.csv"), fixture_bytes("csv/student.csv")).unwrap();
    std::fs::write(dir.join("example.json"), fixture_bytes("json/example.json")).unwrap();
    std::fs::write(dir.join("sample.zip"), build_sample_zip()).unwrap();
}

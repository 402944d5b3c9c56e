//! In-memory PDF builders shared by the integration tests.

#![allow(dead_code)]

use lopdf::{Document, Object, Stream, dictionary};

/// One `BT ... ET` block showing `text` at `(x, y)` in 10pt Helvetica.
pub fn text_at(x: f64, y: f64, text: &str) -> String {
    format!("BT /F1 10 Tf {x} {y} Td ({text}) Tj ET\n")
}

/// A report-like page: a header row and two data rows, with cells placed
/// between the separators `25, 250, 260, 360, 370, 480, 500, 570`.
pub fn report_page() -> String {
    let rows: [(f64, [&str; 4]); 3] = [
        (700.0, ["Name", "Qty", "Price", "Total"]),
        (680.0, ["Apples", "3", "1.50.", "4.50"]),
        (660.0, ["Pears.", "2", "2.00", "4.00"]),
    ];
    let mut content = String::new();
    for (y, cells) in rows {
        for (x, text) in [30.0, 265.0, 375.0, 505.0].into_iter().zip(cells) {
            content.push_str(&text_at(x, y, text));
        }
    }
    content
}

/// A PDF with one Letter-sized page per content stream, Helvetica as /F1.
pub fn pdf_with_pages(contents: &[String]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Write `bytes` to `<dir>/db/report.pdf` and return the file path.
pub fn write_report(dir: &std::path::Path, bytes: &[u8]) -> std::path::PathBuf {
    let db = dir.join("db");
    std::fs::create_dir_all(&db).unwrap();
    let path = db.join("report.pdf");
    std::fs::write(&path, bytes).unwrap();
    path
}

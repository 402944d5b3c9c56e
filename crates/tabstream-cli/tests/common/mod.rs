#![allow(dead_code)]

use std::path::Path;

use lopdf::{Document, Object, Stream, dictionary};

/// Content of a report page: a header and two rows placed between the
/// default column separators.
pub fn report_content() -> String {
    let rows: [(i32, [&str; 4]); 3] = [
        (700, ["Name", "Qty", "Price", "Total"]),
        (680, ["Apples", "3", "1.50", "4.50"]),
        (660, ["Pears", "2", "2.00.", "4.00"]),
    ];
    let mut content = String::new();
    for (y, cells) in rows {
        for (x, text) in [30, 265, 375, 505].into_iter().zip(cells) {
            content.push_str(&format!("BT /F1 10 Tf {x} {y} Td ({text}) Tj ET\n"));
        }
    }
    content
}

/// A PDF with one Letter page per content string, Helvetica as /F1.
pub fn pdf_with_pages(contents: &[String]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
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

/// Lay out `<dir>/db/report.pdf` the way the default flags expect.
pub fn write_report(dir: &Path, bytes: &[u8]) {
    let db = dir.join("db");
    std::fs::create_dir_all(&db).unwrap();
    std::fs::write(db.join("report.pdf"), bytes).unwrap();
}

//! lopdf-based PDF parsing backend.
//!
//! Implements [`PdfBackend`] on top of [lopdf](https://crates.io/crates/lopdf).

use std::sync::LazyLock;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tabstream_core::{BBox, ExtractOptions, PdfError};
use tracing::debug;

use crate::backend::PdfBackend;
use crate::error::BackendError;
use crate::handler::ContentHandler;
use crate::interpreter::{GraphicsState, interpret_content_stream};
use crate::text_state::TextState;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: Document,
    /// Page object ids in page order.
    page_ids: Vec<ObjectId>,
}

impl LopdfDocument {
    pub fn inner(&self) -> &Document {
        &self.inner
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// A page of a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    pub object_id: ObjectId,
    /// 0-based page index.
    pub index: usize,
}

/// The lopdf backend.
///
/// ```ignore
/// use tabstream_parse::{LopdfBackend, PdfBackend};
///
/// let doc = LopdfBackend::open(&bytes)?;
/// let page = LopdfBackend::get_page(&doc, 0)?;
/// ```
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
        if inner.is_encrypted() {
            return Err(BackendError::Core(PdfError::PasswordRequired));
        }
        let page_ids: Vec<ObjectId> = inner.get_pages().values().copied().collect();
        debug!(pages = page_ids.len(), "opened document");
        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error> {
        let object_id = doc.page_ids.get(index).copied().ok_or(BackendError::Core(
            PdfError::PageOutOfRange {
                index,
                count: doc.page_ids.len(),
            },
        ))?;
        Ok(LopdfPage { object_id, index })
    }

    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<BBox, Self::Error> {
        let obj = resolve_inherited(&doc.inner, page.object_id, b"MediaBox")?
            .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))?;
        bbox_from_object(&doc.inner, obj, "MediaBox")
    }

    fn page_crop_box(doc: &Self::Document, page: &Self::Page) -> Result<Option<BBox>, Self::Error> {
        let dict = page_dict(&doc.inner, page.object_id)?;
        match dict.get(b"CropBox") {
            Ok(obj) => bbox_from_object(&doc.inner, obj, "CropBox").map(Some),
            Err(_) => Ok(None),
        }
    }

    fn page_rotate(doc: &Self::Document, page: &Self::Page) -> Result<i32, Self::Error> {
        match resolve_inherited(&doc.inner, page.object_id, b"Rotate")? {
            Some(obj) => {
                let rotation = resolve(&doc.inner, obj)
                    .as_i64()
                    .map_err(|e| BackendError::Parse(format!("Rotate is not an integer: {e}")))?;
                Ok(rotation.rem_euclid(360) as i32)
            }
            None => Ok(0),
        }
    }

    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error> {
        let inner = &doc.inner;
        let content = page_content_bytes(inner, page_dict(inner, page.object_id)?)?;
        if content.len() > options.max_stream_bytes {
            return Err(BackendError::Interpreter(format!(
                "content stream of page {} is {} bytes, limit is {}",
                page.index + 1,
                content.len(),
                options.max_stream_bytes
            )));
        }
        let resources = page_resources(inner, page.object_id)?;

        let mut gstate = GraphicsState::new();
        let mut tstate = TextState::new();
        interpret_content_stream(
            inner,
            &content,
            resources,
            handler,
            options,
            0,
            &mut gstate,
            &mut tstate,
        )
    }
}

/// Follow an indirect reference; other objects are returned as is.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Numeric value of an Integer or Real object.
pub(crate) fn object_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

/// Stream content, decompressed when a /Filter is present.
pub(crate) fn stream_bytes(stream: &Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

fn page_dict(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, BackendError> {
    doc.get_object(page_id)
        .and_then(|o| o.as_dict())
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))
}

fn bbox_from_object(doc: &Document, obj: &Object, key: &str) -> Result<BBox, BackendError> {
    let array = resolve(doc, obj)
        .as_array()
        .map_err(|e| BackendError::Parse(format!("{key} is not an array: {e}")))?;
    if array.len() != 4 {
        return Err(BackendError::Parse(format!(
            "expected 4-element array for {key}, got {}",
            array.len()
        )));
    }
    let mut values = [0.0; 4];
    for (slot, item) in values.iter_mut().zip(array) {
        *slot = object_to_f64(resolve(doc, item))
            .ok_or_else(|| BackendError::Parse(format!("{key} holds a non-number: {item:?}")))?;
    }
    let [x0, y0, x1, y1] = values;
    Ok(BBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)))
}

/// Look up a key on the page or, failing that, its /Parent chain.
fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current = page_id;
    // Bounded walk so a cyclic /Parent chain cannot hang.
    for _ in 0..64 {
        let dict = page_dict(doc, current)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent") {
            Ok(parent) => {
                current = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Parse("page tree /Parent chain too deep".into()))
}

/// Page /Contents, with multiple streams joined by a space.
fn page_content_bytes(doc: &Document, page: &Dictionary) -> Result<Vec<u8>, BackendError> {
    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };
    match resolve(doc, contents) {
        Object::Stream(stream) => stream_bytes(stream),
        Object::Array(items) => {
            let mut content = Vec::new();
            for item in items {
                let stream = resolve(doc, item).as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                if !content.is_empty() {
                    content.push(b' ');
                }
                content.extend_from_slice(&stream_bytes(stream)?);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a stream or array".to_string(),
        )),
    }
}

fn page_resources(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, BackendError> {
    static EMPTY: LazyLock<Dictionary> = LazyLock::new(Dictionary::new);
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => resolve(doc, obj)
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => Ok(&EMPTY),
    }
}

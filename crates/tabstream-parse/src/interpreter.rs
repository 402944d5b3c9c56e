//! Text-only content stream interpreter.
//!
//! Decodes operations with [`lopdf::content::Content`] and follows the
//! graphics and text state needed to position glyphs. Path, colour and
//! image operators are skipped. Form XObjects are interpreted recursively.

use std::collections::HashMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, Stream};
use tabstream_core::{Ctm, ExtractOptions, ExtractWarning, ExtractWarningCode};
use tracing::{debug, warn};

use crate::error::BackendError;
use crate::font::LoadedFont;
use crate::handler::{CharEvent, ContentHandler};
use crate::lopdf_backend::{object_to_f64, resolve, stream_bytes};
use crate::text_renderer::{
    RawChar, TjElement, double_quote_show_string, quote_show_string, show_string,
    show_string_with_positioning,
};
use crate::text_state::{TextState, TextStateSnapshot};

/// CTM plus the `q`/`Q` stack.
#[derive(Debug, Clone, Default)]
pub struct GraphicsState {
    ctm: Ctm,
    stack: Vec<(Ctm, TextStateSnapshot)>,
}

impl GraphicsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ctm(&self) -> &Ctm {
        &self.ctm
    }

    /// `cm`: the new matrix applies before the current CTM.
    pub fn concat(&mut self, m: Ctm) {
        self.ctm = m.concat(&self.ctm);
    }

    pub fn save(&mut self, tstate: &TextState) {
        self.stack.push((self.ctm, tstate.save_snapshot()));
    }

    /// `Q` with an empty stack is ignored.
    pub fn restore(&mut self, tstate: &mut TextState) {
        if let Some((ctm, snapshot)) = self.stack.pop() {
            self.ctm = ctm;
            tstate.restore_snapshot(snapshot);
        }
    }
}

/// Interpret one content stream in the scope of `resources`.
///
/// `depth` counts nested Form XObjects; exceeding
/// [`ExtractOptions::max_recursion_depth`] is an error.
#[allow(clippy::too_many_arguments)]
pub(crate) fn interpret_content_stream(
    doc: &Document,
    stream_bytes: &[u8],
    resources: &Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    gstate: &mut GraphicsState,
    tstate: &mut TextState,
) -> Result<(), BackendError> {
    if depth > options.max_recursion_depth {
        return Err(BackendError::Interpreter(format!(
            "Form XObject recursion depth {depth} exceeds limit {}",
            options.max_recursion_depth
        )));
    }

    let content = Content::decode(stream_bytes)
        .map_err(|e| BackendError::Interpreter(format!("failed to decode content stream: {e}")))?;
    let mut fonts: HashMap<String, LoadedFont> = HashMap::new();

    for op in &content.operations {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => gstate.save(tstate),
            "Q" => gstate.restore(tstate),
            "cm" => {
                if let Some(m) = matrix(operands) {
                    gstate.concat(m);
                }
            }

            "BT" => tstate.begin_text(),
            "ET" => tstate.end_text(),
            "Tf" => {
                let name = operands.first().and_then(name_of).unwrap_or_default();
                let size = number(operands, 1).unwrap_or(0.0);
                if !fonts.contains_key(&name) {
                    let font = load_font(doc, resources, &name, handler, options);
                    fonts.insert(name.clone(), font);
                }
                tstate.set_font(name, size);
            }
            "Tc" => set(operands, &mut tstate.char_spacing),
            "Tw" => set(operands, &mut tstate.word_spacing),
            "Tz" => set(operands, &mut tstate.h_scaling),
            "TL" => set(operands, &mut tstate.leading),
            "Ts" => set(operands, &mut tstate.rise),
            // Render mode does not affect where glyphs sit.
            "Tr" => {}
            "Td" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    tstate.move_text_position(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    tstate.move_text_position_and_set_leading(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix(operands) {
                    tstate.set_text_matrix(m);
                }
            }
            "T*" => tstate.move_to_next_line(),

            "Tj" | "'" | "\"" | "TJ" => {
                let font = current_font(&mut fonts, tstate);
                let width = |code: u32| font.width(code);
                let code_len = font.code_len();
                let raw = match op.operator.as_str() {
                    "Tj" => operands
                        .first()
                        .and_then(string_of)
                        .map(|s| show_string(tstate, s, code_len, &width)),
                    "'" => operands
                        .first()
                        .and_then(string_of)
                        .map(|s| quote_show_string(tstate, s, code_len, &width)),
                    "\"" => match (number(operands, 0), number(operands, 1), operands.get(2)) {
                        (Some(aw), Some(ac), Some(s)) => string_of(s).map(|s| {
                            double_quote_show_string(tstate, aw, ac, s, code_len, &width)
                        }),
                        _ => None,
                    },
                    _ => operands
                        .first()
                        .and_then(|o| o.as_array().ok())
                        .map(|arr| {
                            let elements = tj_elements(arr);
                            show_string_with_positioning(tstate, &elements, code_len, &width)
                        }),
                };
                if let Some(raw) = raw {
                    emit_chars(raw, font, tstate, gstate, handler);
                }
            }

            "Do" => {
                if let Some(name) = operands.first().and_then(name_of) {
                    handle_do(
                        doc, resources, &name, handler, options, depth, gstate, tstate,
                    )?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn current_font<'a>(fonts: &'a mut HashMap<String, LoadedFont>, tstate: &TextState) -> &'a LoadedFont {
    // Text shown before any Tf uses fallback metrics.
    fonts
        .entry(tstate.font_name.clone())
        .or_insert_with(|| LoadedFont::fallback(&tstate.font_name))
}

fn emit_chars(
    raw: Vec<RawChar>,
    font: &LoadedFont,
    tstate: &TextState,
    gstate: &GraphicsState,
    handler: &mut dyn ContentHandler,
) {
    let ctm = gstate.ctm().to_array();
    let (ascent, descent) = font.vertical_metrics();
    for rc in raw {
        handler.on_char(CharEvent {
            char_code: rc.char_code,
            unicode: font.unicode(rc.char_code),
            font_name: font.base_name.clone(),
            font_size: tstate.font_size,
            text_matrix: rc.text_matrix,
            ctm,
            displacement: rc.width,
            h_scaling: tstate.h_scaling_normalized(),
            rise: tstate.rise,
            ascent,
            descent,
        });
    }
}

fn load_font(
    doc: &Document,
    resources: &Dictionary,
    name: &str,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
) -> LoadedFont {
    let font_dict = resources
        .get(b"Font")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
        .and_then(|fonts| fonts.get(name.as_bytes()).ok())
        .and_then(|o| resolve(doc, o).as_dict().ok());

    let Some(font_dict) = font_dict else {
        warn!(font = name, "font not found in resources, using default metrics");
        if options.collect_warnings {
            handler.on_warning(
                ExtractWarning::with_code(
                    ExtractWarningCode::MissingFont,
                    "font not found in resources, using default metrics",
                )
                .with_font(name),
            );
        }
        return LoadedFont::fallback(name);
    };

    match LoadedFont::load(doc, font_dict, name) {
        Ok(font) => {
            debug!(font = name, base = %font.base_name, "loaded font");
            font
        }
        Err(e) => {
            warn!(font = name, error = %e, "failed to load font, using default metrics");
            if options.collect_warnings {
                handler.on_warning(
                    ExtractWarning::with_code(ExtractWarningCode::MalformedObject, e.to_string())
                        .with_font(name),
                );
            }
            LoadedFont::fallback(name)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_do(
    doc: &Document,
    resources: &Dictionary,
    name: &str,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    gstate: &mut GraphicsState,
    tstate: &mut TextState,
) -> Result<(), BackendError> {
    let stream = resources
        .get(b"XObject")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
        .and_then(|xobjects| xobjects.get(name.as_bytes()).ok())
        .and_then(|o| resolve(doc, o).as_stream().ok());

    let Some(stream) = stream else {
        if options.collect_warnings {
            handler.on_warning(ExtractWarning::with_code(
                ExtractWarningCode::MalformedObject,
                format!("XObject /{name} not found in resources"),
            ));
        }
        return Ok(());
    };

    let is_form = stream
        .dict
        .get(b"Subtype")
        .ok()
        .and_then(|o| o.as_name().ok())
        == Some(b"Form".as_slice());
    if !is_form {
        return Ok(());
    }
    handle_form_xobject(
        doc, stream, name, resources, handler, options, depth, gstate, tstate,
    )
}

#[allow(clippy::too_many_arguments)]
fn handle_form_xobject(
    doc: &Document,
    stream: &Stream,
    name: &str,
    parent_resources: &Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    gstate: &mut GraphicsState,
    tstate: &mut TextState,
) -> Result<(), BackendError> {
    let bytes = stream_bytes(stream)?;
    if bytes.len() > options.max_stream_bytes {
        return Err(BackendError::Interpreter(format!(
            "Form XObject /{name} is {} bytes, limit is {}",
            bytes.len(),
            options.max_stream_bytes
        )));
    }
    let form_resources = stream
        .dict
        .get(b"Resources")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
        .unwrap_or(parent_resources);

    gstate.save(tstate);
    if let Some(m) = stream
        .dict
        .get(b"Matrix")
        .ok()
        .and_then(|o| resolve(doc, o).as_array().ok())
        .and_then(|arr| matrix(arr))
    {
        gstate.concat(m);
    }
    debug!(xobject = name, depth = depth + 1, "entering Form XObject");
    let result = interpret_content_stream(
        doc,
        &bytes,
        form_resources,
        handler,
        options,
        depth + 1,
        gstate,
        tstate,
    );
    gstate.restore(tstate);
    result
}

fn number(operands: &[Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(object_to_f64)
}

fn set(operands: &[Object], target: &mut f64) {
    if let Some(v) = number(operands, 0) {
        *target = v;
    }
}

fn matrix(operands: &[Object]) -> Option<Ctm> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = [0.0; 6];
    for (slot, o) in m.iter_mut().zip(operands) {
        *slot = object_to_f64(o)?;
    }
    Some(Ctm::from_array(m))
}

fn name_of(o: &Object) -> Option<String> {
    o.as_name()
        .ok()
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

fn string_of(o: &Object) -> Option<&[u8]> {
    match o {
        Object::String(bytes, _) => Some(bytes.as_slice()),
        _ => None,
    }
}

fn tj_elements(arr: &[Object]) -> Vec<TjElement> {
    arr.iter()
        .filter_map(|o| match o {
            Object::String(bytes, _) => Some(TjElement::String(bytes.clone())),
            other => object_to_f64(other).map(TjElement::Adjustment),
        })
        .collect()
}

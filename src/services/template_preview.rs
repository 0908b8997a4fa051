// ============================================================================
// TEMPLATE PREVIEW - Vista previa del mensaje de WhatsApp
// ============================================================================
// Función pura: metadatos de la plantilla → bloques a mostrar, en el orden
// original de los componentes. El estilo (negrita, footer gris) es de la vista.
// ============================================================================

use std::borrow::Cow;

use regex::{Captures, Regex};

use crate::models::{ComponentExample, HeaderFormat, Template, TemplateComponent};

pub const PLACEHOLDER_TEXT: &str = "Sua mensagem aparecerá aqui...";
pub const LOADING_TEXT: &str = "Carregando preview...";

lazy_static::lazy_static! {
    static ref PLACEHOLDER_TOKEN: Regex = Regex::new(r"\{\{(\d+)\}\}").expect("regex de placeholder válida");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewBlock {
    HeaderText(String),
    HeaderMedia { kind: MediaKind, url: String },
    Body(String),
    Footer(String),
    Buttons(Vec<String>),
    /// Ninguna plantilla seleccionada
    Placeholder(String),
    /// Plantilla elegida pero sus metadatos aún no llegaron
    Loading(String),
}

/// Reemplaza cada `{{k}}` por `values[k-1]`; sin valor, el token queda literal.
/// Una sola pasada: un valor que contiene `{{n}}` no se vuelve a expandir.
pub fn substitute_placeholders<'a>(text: &'a str, values: &[String]) -> Cow<'a, str> {
    PLACEHOLDER_TOKEN.replace_all(text, |caps: &Captures| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|k| k.checked_sub(1))
            .and_then(|index| values.get(index))
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    })
}

fn header_block(format: Option<HeaderFormat>, text: Option<&str>, example: Option<&ComponentExample>) -> Option<PreviewBlock> {
    let first_handle = || {
        example
            .and_then(|e| e.header_handle.first())
            .filter(|url| !url.is_empty())
            .cloned()
    };

    match format {
        Some(HeaderFormat::Text) => text.map(|t| PreviewBlock::HeaderText(t.to_string())),
        Some(HeaderFormat::Image) => first_handle().map(|url| PreviewBlock::HeaderMedia { kind: MediaKind::Image, url }),
        Some(HeaderFormat::Video) => first_handle().map(|url| PreviewBlock::HeaderMedia { kind: MediaKind::Video, url }),
        _ => None,
    }
}

fn body_block(text: &str, example: Option<&ComponentExample>, example_index: usize) -> PreviewBlock {
    let values = example
        .and_then(|e| e.body_text.get(example_index))
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    PreviewBlock::Body(substitute_placeholders(text, values).into_owned())
}

/// Bloques de la plantilla; `example_index` elige la lista de `body_text` (0 = primera)
pub fn render(template: &Template, example_index: usize) -> Vec<PreviewBlock> {
    template
        .components
        .iter()
        .filter_map(|component| match component {
            TemplateComponent::Header { format, text, example } => {
                header_block(*format, text.as_deref(), example.as_ref())
            }
            TemplateComponent::Body { text, example } => {
                Some(body_block(text, example.as_ref(), example_index))
            }
            TemplateComponent::Footer { text } => Some(PreviewBlock::Footer(text.clone())),
            TemplateComponent::Buttons { buttons } => Some(PreviewBlock::Buttons(
                buttons.iter().map(|b| b.text.clone()).collect(),
            )),
            TemplateComponent::Unknown => None,
        })
        .collect()
}

/// Vista previa según la selección actual del formulario
pub fn render_selection(selected: Option<&str>, templates: &[Template], example_index: usize) -> Vec<PreviewBlock> {
    let Some(name) = selected.filter(|name| !name.is_empty()) else {
        return vec![PreviewBlock::Placeholder(PLACEHOLDER_TEXT.to_string())];
    };

    match templates.iter().find(|t| t.name == name) {
        Some(template) => render(template, example_index),
        None => vec![PreviewBlock::Loading(LOADING_TEXT.to_string())],
    }
}

// ============================================================================
// TEMPLATE - Plantillas de mensaje de WhatsApp (metadatos de Meta)
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::response::is_success;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub components: Vec<TemplateComponent>,
}

/// Componente etiquetado por `type`. Tipos nuevos caen en `Unknown`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum TemplateComponent {
    Header {
        #[serde(default)]
        format: Option<HeaderFormat>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        example: Option<ComponentExample>,
    },
    Body {
        #[serde(default)]
        text: String,
        #[serde(default)]
        example: Option<ComponentExample>,
    },
    Footer {
        #[serde(default)]
        text: String,
    },
    Buttons {
        #[serde(default)]
        buttons: Vec<TemplateButton>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HeaderFormat {
    Text,
    Image,
    Video,
    Document,
    Location,
    #[serde(other)]
    Other,
}

/// Valores de ejemplo que Meta guarda junto a la plantilla
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentExample {
    #[serde(default)]
    pub header_handle: Vec<String>,
    #[serde(default)]
    pub header_text: Vec<String>,
    /// Una lista de valores por ejemplo; `{{k}}` usa el valor k-1
    #[serde(default)]
    pub body_text: Vec<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateButton {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Nombres + metadatos devueltos por el endpoint de plantillas
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplateCatalog {
    pub names: Vec<String>,
    pub meta: Vec<Template>,
}

impl TemplateCatalog {
    /// `None` si la respuesta no trae `success` verdadero
    pub fn from_response(response: &Value) -> Option<Self> {
        if !is_success(response) {
            return None;
        }

        let names = response
            .get("templates")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(name) => Some(name.clone()),
                        // Algunas versiones devuelven objetos completos
                        Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let meta = response
            .get("templateMeta")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| match serde_json::from_value::<Template>(item.clone()) {
                        Ok(template) => Some(template),
                        Err(e) => {
                            log::warn!("⚠️ Metadatos de plantilla ignorados: {}", e);
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self { names, meta })
    }

    pub fn find(&self, name: &str) -> Option<&Template> {
        self.meta.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn components_deserialize_by_type_tag() {
        let template: Template = serde_json::from_value(json!({
            "name": "boas_vindas",
            "components": [
                {"type": "HEADER", "format": "IMAGE", "example": {"header_handle": ["https://cdn/x.png"]}},
                {"type": "BODY", "text": "Olá {{1}}", "example": {"body_text": [["Maria"]]}},
                {"type": "FOOTER", "text": "Responda SAIR"},
                {"type": "BUTTONS", "buttons": [{"type": "QUICK_REPLY", "text": "Quero"}]},
                {"type": "CAROUSEL", "cards": []}
            ]
        }))
        .unwrap();

        assert_eq!(template.components.len(), 5);
        assert!(matches!(
            template.components[0],
            TemplateComponent::Header { format: Some(HeaderFormat::Image), .. }
        ));
        assert_eq!(template.components[4], TemplateComponent::Unknown);
    }

    #[test]
    fn unknown_header_format_is_tolerated() {
        let component: TemplateComponent =
            serde_json::from_value(json!({"type": "HEADER", "format": "STICKER"})).unwrap();
        assert!(matches!(component, TemplateComponent::Header { format: Some(HeaderFormat::Other), .. }));
    }

    #[test]
    fn catalog_requires_success_and_skips_bad_meta() {
        assert!(TemplateCatalog::from_response(&json!({"success": false, "templates": ["a"]})).is_none());

        let catalog = TemplateCatalog::from_response(&json!({
            "success": "true",
            "templates": ["promo", {"name": "aviso"}, 3],
            "templateMeta": [{"name": "promo", "components": []}, {"components": "x"}]
        }))
        .unwrap();

        assert_eq!(catalog.names, vec!["promo".to_string(), "aviso".to_string()]);
        assert_eq!(catalog.meta.len(), 1);
        assert!(catalog.find("promo").is_some());
        assert!(catalog.find("aviso").is_none());
    }
}

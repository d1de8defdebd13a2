#![forbid(unsafe_code)]

use crate::ids::slugify;
use crate::model::{BreakdownItem, DonutData, Widget, WidgetType};
use serde_json::{Map, Number, Value};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Category,
    Widget,
}

impl Entity {
    pub fn as_str(self) -> &'static str {
        match self {
            Entity::Category => "category",
            Entity::Widget => "widget",
        }
    }
}

/// First violated rule of a create/update payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    MissingRequiredField(Entity),
    InvalidTotal,
    InvalidBreakdownShape,
    InvalidBreakdownItem { index: usize },
    InvalidWidgetType { value: String },
    InvalidWidgetList,
}

impl ValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingRequiredField(Entity::Category) => "Name and description are required",
            Self::MissingRequiredField(Entity::Widget) => "Title and type are required",
            Self::InvalidTotal => "Data total must be a non-negative number",
            Self::InvalidBreakdownShape => "Data breakdown must be an array",
            Self::InvalidBreakdownItem { .. } => {
                "Each breakdown item must have name, value, and color"
            }
            Self::InvalidWidgetType { .. } => {
                "Invalid widget type. Must be one of: donut, bar, line, text"
            }
            Self::InvalidWidgetList => "Widgets must be an array of valid widgets with unique ids",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBreakdownItem { index } => {
                write!(f, "{} (breakdown[{index}])", self.message())
            }
            Self::InvalidWidgetType { value } => write!(f, "{} (got {value})", self.message()),
            other => f.write_str(other.message()),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Accepted widget create/update payload.
///
/// `data` is `None` when the caller omitted it: creation substitutes
/// [`DonutData::default`], update keeps the stored value.
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetPayload {
    pub title: String,
    pub kind: WidgetType,
    pub data: Option<DonutData>,
}

impl WidgetPayload {
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryPayload {
    pub name: String,
    pub description: String,
    pub widgets: Vec<Widget>,
    pub extra: Map<String, Value>,
}

impl CategoryPayload {
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Keeps only values a falsy test would not skip: `null`, `false`, `0` and
/// `""` all read as omitted.
fn truthy(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
}

fn non_negative(value: Option<&Value>) -> Option<&Number> {
    match value {
        Some(Value::Number(n)) if n.as_f64().is_some_and(|f| f >= 0.0) => Some(n),
        _ => None,
    }
}

/// Checks a widget payload rule by rule; the first failure is returned.
///
/// The type enumeration is checked last, after the `data` shape rules.
pub fn validate_widget_payload(raw: &Value) -> Result<WidgetPayload, ValidationError> {
    let obj = raw.as_object();
    let field = |name: &str| obj.and_then(|o| truthy(o.get(name)));

    // Rule 1: title and type.
    let title = non_blank_str(field("title"))
        .filter(|title| !slugify(title).is_empty())
        .ok_or(ValidationError::MissingRequiredField(Entity::Widget))?;
    let raw_type = field("type").ok_or(ValidationError::MissingRequiredField(Entity::Widget))?;

    // Rules 2-4: data shape.
    let data = match field("data") {
        None => None,
        Some(data) => Some(validate_data(data)?),
    };

    // Rule 5: type enumeration.
    let kind = raw_type
        .as_str()
        .and_then(WidgetType::parse)
        .ok_or_else(|| ValidationError::InvalidWidgetType {
            value: raw_type.to_string(),
        })?;

    Ok(WidgetPayload {
        title: title.to_string(),
        kind,
        data,
    })
}

fn validate_data(data: &Value) -> Result<DonutData, ValidationError> {
    let total = non_negative(data.get("total")).ok_or(ValidationError::InvalidTotal)?;
    let Some(items) = data.get("breakdown").and_then(|v| v.as_array()) else {
        return Err(ValidationError::InvalidBreakdownShape);
    };

    let mut breakdown = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let name = non_blank_str(item.get("name"));
        let value = non_negative(item.get("value"));
        let color = non_blank_str(item.get("color"));
        let (Some(name), Some(value), Some(color)) = (name, value, color) else {
            return Err(ValidationError::InvalidBreakdownItem { index });
        };
        breakdown.push(BreakdownItem {
            name: name.to_string(),
            value: value.clone(),
            color: color.to_string(),
        });
    }

    Ok(DonutData {
        total: total.clone(),
        breakdown,
    })
}

/// Checks a category creation payload. The id is always derived from `name`,
/// so a supplied `id` is discarded; other unknown keys are kept.
pub fn validate_category_payload(raw: &Value) -> Result<CategoryPayload, ValidationError> {
    let missing = ValidationError::MissingRequiredField(Entity::Category);
    let Some(obj) = raw.as_object() else {
        return Err(missing);
    };
    let name = non_blank_str(obj.get("name"))
        .filter(|name| !slugify(name).is_empty())
        .ok_or_else(|| missing.clone())?;
    let description = non_blank_str(obj.get("description")).ok_or(missing)?;

    let widgets = match present(obj.get("widgets")) {
        None => Vec::new(),
        Some(raw_widgets) => {
            let widgets: Vec<Widget> = serde_json::from_value(raw_widgets.clone())
                .map_err(|_| ValidationError::InvalidWidgetList)?;
            let unique = {
                let mut seen = HashSet::new();
                widgets.iter().all(|w| seen.insert(w.id.as_str()))
            };
            if !unique {
                return Err(ValidationError::InvalidWidgetList);
            }
            widgets
        }
    };

    let extra = obj
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "id" | "name" | "description" | "widgets"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(CategoryPayload {
        name: name.to_string(),
        description: description.to_string(),
        widgets,
        extra,
    })
}

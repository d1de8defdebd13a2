#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Donut,
    Bar,
    Line,
    Text,
}

impl WidgetType {
    pub const ALL: [WidgetType; 4] = [
        WidgetType::Donut,
        WidgetType::Bar,
        WidgetType::Line,
        WidgetType::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WidgetType::Donut => "donut",
            WidgetType::Bar => "bar",
            WidgetType::Line => "line",
            WidgetType::Text => "text",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub name: String,
    pub value: Number,
    pub color: String,
}

/// Chart payload shared by every widget type. Only donut charts render it today.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DonutData {
    pub total: Number,
    pub breakdown: Vec<BreakdownItem>,
}

impl Default for DonutData {
    fn default() -> Self {
        Self {
            total: Number::from(0u64),
            breakdown: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: WidgetType,
    pub data: DonutData,
    /// Fields written by other tools; kept as-is across updates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub widgets: Vec<Widget>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    pub fn widget(&self, widget_id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|widget| widget.id == widget_id)
    }

    pub fn widget_position(&self, widget_id: &str) -> Option<usize> {
        self.widgets.iter().position(|widget| widget.id == widget_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn widget_type_round_trips_through_lowercase_names() {
        for kind in WidgetType::ALL {
            assert_eq!(WidgetType::parse(kind.as_str()), Some(kind));
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
        assert_eq!(WidgetType::parse("pie"), None);
        assert_eq!(WidgetType::parse("Donut"), None);
    }

    #[test]
    fn integer_totals_stay_integers_on_disk() {
        let data = DonutData {
            total: Number::from(100u64),
            breakdown: vec![BreakdownItem {
                name: "Q1".to_string(),
                value: Number::from(100u64),
                color: "#1DA45A".to_string(),
            }],
        };
        let encoded = serde_json::to_string(&data).unwrap();
        assert_eq!(
            encoded,
            r##"{"total":100,"breakdown":[{"name":"Q1","value":100,"color":"#1DA45A"}]}"##
        );
    }

    #[test]
    fn category_keeps_unknown_fields_and_tolerates_missing_description() {
        let raw = json!({
            "id": "cspm",
            "name": "CSPM Executive Dashboard",
            "owner": "secops",
            "widgets": [{
                "id": "cloud-accounts",
                "title": "Cloud Accounts",
                "type": "donut",
                "data": { "total": 4, "breakdown": [] },
                "pinned": true
            }]
        });
        let category: Category = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(category.description, None);
        assert_eq!(category.extra.get("owner"), Some(&json!("secops")));
        assert_eq!(category.widgets[0].extra.get("pinned"), Some(&json!(true)));
        assert_eq!(category.widget_position("cloud-accounts"), Some(0));
        assert!(category.widget("missing").is_none());

        assert_eq!(serde_json::to_value(&category).unwrap(), raw);
    }
}

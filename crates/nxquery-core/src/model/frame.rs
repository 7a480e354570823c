// ── Frames ──
//
// A frame is a named, ordered set of equal-length typed columns. Display
// annotations (unit, value mappings, fixed color) live on the column
// config, never in the cell values.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    String,
    Boolean,
    Time,
}

/// Cell storage for one column.
///
/// String columns render missing values as `""`; the other types keep
/// them as `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum FieldValues {
    Number(Vec<Option<f64>>),
    String(Vec<String>),
    Boolean(Vec<Option<bool>>),
    Time(Vec<Option<DateTime<Utc>>>),
}

impl FieldValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Number(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::Time(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Number(_) => FieldType::Number,
            Self::String(_) => FieldType::String,
            Self::Boolean(_) => FieldType::Boolean,
            Self::Time(_) => FieldType::Time,
        }
    }

    /// JSON rendering of the cell at `row`; `Null` for missing cells.
    pub fn json_at(&self, row: usize) -> Value {
        match self {
            Self::Number(v) => v
                .get(row)
                .copied()
                .flatten()
                .map_or(Value::Null, Value::from),
            Self::String(v) => v.get(row).map_or(Value::Null, |s| Value::from(s.as_str())),
            Self::Boolean(v) => v.get(row).copied().flatten().map_or(Value::Null, Value::from),
            Self::Time(v) => v.get(row).copied().flatten().map_or(Value::Null, |t| {
                Value::from(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }),
        }
    }
}

/// Value-to-display annotation for enumerated string columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueMapping {
    pub value: String,
    pub text: String,
    pub color: String,
}

/// Single color applied to a whole column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldColor {
    pub mode: &'static str,
    pub fixed_color: String,
}

impl FieldColor {
    pub fn fixed(color: impl Into<String>) -> Self {
        Self {
            mode: "fixed",
            fixed_color: color.into(),
        }
    }
}

/// Display metadata of a column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<ValueMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<FieldColor>,
}

impl FieldConfig {
    pub fn mapping_for(&self, value: &str) -> Option<&ValueMapping> {
        self.mappings.iter().find(|m| m.value == value)
    }
}

/// One named column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(skip_serializing_if = "is_default_config")]
    pub config: FieldConfig,
    #[serde(flatten)]
    pub values: FieldValues,
}

fn is_default_config(config: &FieldConfig) -> bool {
    *config == FieldConfig::default()
}

impl Field {
    pub fn new(name: impl Into<String>, values: FieldValues) -> Self {
        Self {
            name: name.into(),
            config: FieldConfig::default(),
            values,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.config.unit = Some(unit.into());
        self
    }

    pub fn with_mappings(mut self, mappings: Vec<ValueMapping>) -> Self {
        self.config.mappings = mappings;
        self
    }

    pub fn with_color(mut self, color: FieldColor) -> Self {
        self.config.color = Some(color);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn field_type(&self) -> FieldType {
        self.values.field_type()
    }
}

/// A named, ordered collection of equal-length columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub name: String,
    fields: Vec<Field>,
}

impl Frame {
    /// Build a frame, rejecting columns of unequal length.
    pub fn with_fields(name: impl Into<String>, fields: Vec<Field>) -> Result<Self, CoreError> {
        let name = name.into();
        if let Some(first) = fields.first() {
            let rows = first.len();
            if let Some(bad) = fields.iter().find(|f| f.len() != rows) {
                return Err(CoreError::shaping(format!(
                    "frame '{name}': column '{}' has {} rows, expected {rows}",
                    bad.name,
                    bad.len()
                )));
            }
        }
        Ok(Self { name, fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.fields.first().map_or(0, Field::len)
    }

    /// Re-flatten the frame into rows of JSON cells, in column order.
    pub fn rows(&self) -> Vec<Vec<Value>> {
        (0..self.row_count())
            .map(|row| self.fields.iter().map(|f| f.values.json_at(row)).collect())
            .collect()
    }
}

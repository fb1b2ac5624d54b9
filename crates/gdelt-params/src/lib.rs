//! Parameter kinds, validation, and category lookup tables.

mod category;
pub mod date;
mod kind;
mod tables;

pub use category::{CategoryOptions, CategoryParameter, CategoryTable, TableError, ALL_LABEL};
pub use gdelt_types::{ParamValue, ParameterSchema, ParameterValues, Selection, ValidationError};
pub use kind::ParameterKind;
pub use tables::{
    actor_role, measure, quad_class, CategoryTables, CAMEO_COUNTRY_FILE, CAMEO_EVENTCODES_FILE,
    FIPS_COUNTRY_FILE,
};

/// One declared parameter of a function: id, display label, and kind.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub id: String,
    pub label: String,
    pub kind: ParameterKind,
}

impl ParameterSpec {
    pub fn new(id: &str, label: &str, kind: ParameterKind) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
        }
    }

    /// Validate a raw value; the error names this parameter.
    pub fn validate(&self, raw: &serde_json::Value) -> Result<ParamValue, ValidationError> {
        self.kind
            .parse(raw)
            .map_err(|message| ValidationError::new(message, self.id.as_str()))
    }

    /// Client-facing description, with the default shown in input format.
    pub fn schema(&self, default: Option<&ParamValue>) -> ParameterSchema {
        let (options, flags) = match &self.kind {
            ParameterKind::Category(c) => (c.choices(), c.options()),
            _ => (Vec::new(), CategoryOptions::default()),
        };
        ParameterSchema {
            id: self.id.clone(),
            label: self.label.clone(),
            kind: self.kind.name().to_string(),
            default: default.and_then(|v| self.kind.display(v)),
            options,
            allow_multiple: flags.allow_multiple,
            allow_all: flags.allow_all,
            allow_null: flags.allow_null,
        }
    }
}

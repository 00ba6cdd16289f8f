use rowquery_parser::ast::{Scalar, ScalarKind};
use serde::{Deserialize, Serialize};

/// One entry of the field registry handed to the codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterField {
    #[serde(alias = "value")]
    pub column: String,
    #[serde(default)]
    pub label: String,
    /// Disabled fields are neither written to nor read from the filter string.
    #[serde(default)]
    pub command_disabled: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text. Decoded values are typed by their shape.
    Input,
    Checkbox {
        #[serde(default)]
        scalar: ScalarKind,
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    Slider {
        min: f64,
        max: f64,
    },
    Timerange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: Scalar,
}

impl FilterField {
    fn new(column: impl Into<String>, kind: FieldKind) -> Self {
        let column = column.into();
        Self {
            label: column.clone(),
            column,
            command_disabled: false,
            kind,
        }
    }

    pub fn input(column: impl Into<String>) -> Self {
        Self::new(column, FieldKind::Input)
    }

    pub fn checkbox(column: impl Into<String>, scalar: ScalarKind) -> Self {
        Self::new(
            column,
            FieldKind::Checkbox {
                scalar,
                options: vec![],
            },
        )
    }

    pub fn slider(column: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(column, FieldKind::Slider { min, max })
    }

    pub fn timerange(column: impl Into<String>) -> Self {
        Self::new(column, FieldKind::Timerange)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_options(mut self, new_options: Vec<FieldOption>) -> Self {
        if let FieldKind::Checkbox { options, .. } = &mut self.kind {
            *options = new_options;
        }
        self
    }

    pub fn disabled(mut self) -> Self {
        self.command_disabled = true;
        self
    }
}

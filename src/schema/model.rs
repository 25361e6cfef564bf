//! Data structures describing a character schema's field tree.
//!
//! A schema is pure data: the contract synthesizer, pass planner, and prompt
//! composer all derive their behavior from it without the schema itself
//! carrying any.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type tag for a single field in the schema tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    ShortText,
    Number,
    Boolean,
    SingleChoice,
    OrderedScale,
    TraitList,
    ReferenceList,
    RankedList,
    Array,
    NestedObject,
}

/// Selects extra canned prompt guidance for a field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenerationHint {
    Identity,
    Narrative,
    Behavioral,
    Calibration,
}

/// Verbosity policy applied to every generated value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Specificity {
    Low,
    #[default]
    Medium,
    High,
}

/// One node in a schema's field tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Stable identifier, unique among siblings.
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    /// Free-text guidance folded into generation prompts.
    #[serde(default)]
    pub description: String,
    /// Whether the user may pin a literal value before generation.
    #[serde(default)]
    pub seedable: bool,
    /// Choice options for `single_choice` fields.
    #[serde(default)]
    pub options: Vec<String>,
    /// Ordered levels (weakest to strongest) for `ordered_scale` fields.
    #[serde(default)]
    pub levels: Vec<String>,
    /// Target item count for trait/reference/ranked list fields.
    #[serde(default)]
    pub count: Option<u32>,
    /// Item shape descriptor for `array` fields without child fields.
    #[serde(default)]
    pub descriptor: Option<String>,
    /// Inline child fields for `nested_object` and object-item `array` kinds.
    #[serde(default)]
    pub children: Vec<Field>,
    #[serde(default)]
    pub generation_hint: Option<GenerationHint>,
    /// Sibling keys this field must stay causally consistent with.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl Field {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            description: String::new(),
            seedable: false,
            options: Vec::new(),
            levels: Vec::new(),
            count: None,
            descriptor: None,
            children: Vec::new(),
            generation_hint: None,
            depends_on: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels = levels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = Some(descriptor.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Field>) -> Self {
        self.children = children;
        self
    }

    pub fn with_hint(mut self, hint: GenerationHint) -> Self {
        self.generation_hint = Some(hint);
        self
    }

    pub fn with_depends_on<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn seedable(mut self) -> Self {
        self.seedable = true;
        self
    }
}

/// A named, versioned collection of top-level fields plus generation policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSchema {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub description: String,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub specificity: Specificity,
    /// Ordered generation passes, each a list of top-level field keys.
    /// Fields omitted here fall into an implicit trailing pass.
    #[serde(default)]
    pub generation_order: Vec<Vec<String>>,
    /// Completed example profiles attached as few-shot anchors.
    #[serde(default)]
    pub examples: Vec<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const fn default_version() -> u32 {
    1
}

impl CharacterSchema {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            version: default_version(),
            description: String::new(),
            fields,
            specificity: Specificity::default(),
            generation_order: Vec::new(),
            examples: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Looks up a top-level field by key.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Keys of every top-level field, in schema order.
    pub fn field_keys(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.key.clone()).collect()
    }

    /// Returns human-readable issues; an empty list means the schema is
    /// well-formed. Planning and contract synthesis tolerate all of these
    /// by degrading, so authoring surfaces are the intended consumer.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        validate_fields(&self.fields, "", &mut issues);
        let mut ordered = std::collections::HashSet::new();
        for group in &self.generation_order {
            for key in group {
                if self.field(key).is_none() {
                    issues.push(format!("generation_order references unknown field '{key}'"));
                } else if !ordered.insert(key.clone()) {
                    issues.push(format!("generation_order lists field '{key}' more than once"));
                }
            }
        }
        issues
    }
}

fn validate_fields(fields: &[Field], path: &str, issues: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    for field in fields {
        let full_key = if path.is_empty() {
            field.key.clone()
        } else {
            format!("{path}.{}", field.key)
        };
        if !seen.insert(field.key.clone()) {
            issues.push(format!("duplicate field key '{full_key}'"));
        }
        match field.kind {
            FieldKind::SingleChoice if field.options.is_empty() => {
                issues.push(format!("single_choice field '{full_key}' has no options"));
            }
            FieldKind::OrderedScale if field.levels.is_empty() => {
                issues.push(format!("ordered_scale field '{full_key}' has no levels"));
            }
            FieldKind::NestedObject if field.children.is_empty() => {
                issues.push(format!("nested_object field '{full_key}' has no child fields"));
            }
            _ => {}
        }
        if !field.children.is_empty() {
            validate_fields(&field.children, &full_key, issues);
        }
    }
}

#![deny(missing_docs)]

//! # Document Model
//!
//! Intermediate Deserialization Layer for OpenAPI / Swagger documents.
//! These structs map directly to the YAML/JSON objects the resolvers need;
//! everything else in a document is ignored at parse time.
//!
//! `SchemaNode` is the raw input unit of the whole pipeline: a tagged
//! structure that is either a `$ref` pointer or an inline schema. Nodes form
//! a directed graph that may be cyclic and may span multiple documents held
//! in a [`DocumentSet`].

use crate::error::{GenError, GenResult};
use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Primitive kind carried by a schema's `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// `type: string`
    String,
    /// `type: number`
    Number,
    /// `type: integer` (kept distinct; maps to `number` at scalar time)
    Integer,
    /// `type: boolean`
    Boolean,
    /// `type: array`
    Array,
    /// `type: object`
    Object,
}

impl SchemaKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// The `type` keyword as written in the document.
///
/// OpenAPI 3.0 uses a single string plus a separate `nullable` flag;
/// OpenAPI 3.1 permits `type: [T, "null"]` arrays. Both shapes deserialize
/// into this tag; unknown type names are tolerated and treated as unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeTag {
    /// The concrete primitive kind, when one was declared.
    pub kind: Option<SchemaKind>,
    /// True when the type list contained `"null"`.
    pub null: bool,
}

impl TypeTag {
    /// True when no `type` keyword was present at all.
    pub fn is_unset(&self) -> bool {
        self.kind.is_none() && !self.null
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        match raw {
            Value::String(name) => Ok(TypeTag {
                null: name == "null",
                kind: SchemaKind::from_name(&name),
            }),
            Value::Array(names) => {
                let mut tag = TypeTag::default();
                for entry in names {
                    let Some(name) = entry.as_str() else {
                        return Err(DeError::custom("type array entries must be strings"));
                    };
                    if name == "null" {
                        tag.null = true;
                    } else if tag.kind.is_none() {
                        tag.kind = SchemaKind::from_name(name);
                    }
                }
                Ok(tag)
            }
            other => Err(DeError::custom(format!(
                "unexpected value for 'type': {}",
                other
            ))),
        }
    }
}

impl Serialize for TypeTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match (self.kind, self.null) {
            (Some(kind), false) => serializer.serialize_str(kind.name()),
            (Some(kind), true) => vec![kind.name(), "null"].serialize(serializer),
            (None, true) => serializer.serialize_str("null"),
            (None, false) => serializer.serialize_none(),
        }
    }
}

/// The `additionalProperties` keyword: a boolean or a nested schema.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `additionalProperties: true` / `false`
    Flag(bool),
    /// `additionalProperties: { ...schema }`
    Node(Box<SchemaNode>),
}

/// Union narrowing metadata (`discriminator`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Discriminator {
    /// The property whose value tags the union member.
    pub property_name: String,
    /// Explicit tag value -> schema reference table.
    pub mapping: IndexMap<String, String>,
}

/// One node of the input schema graph.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaNode {
    /// Pointer to another node (`$ref`). When present, every other field is
    /// ignored by the resolvers.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// The declared `type` keyword (string or 3.1 array form).
    #[serde(rename = "type", skip_serializing_if = "TypeTag::is_unset")]
    pub type_tag: TypeTag,

    /// OpenAPI 3.0 `nullable` flag.
    pub nullable: bool,

    /// Enumeration literal values.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    /// Format hint (e.g. `binary`, `date`, `date-time`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Array item schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    /// Object property map, in declaration order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,

    /// Required property keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// `additionalProperties` keyword.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    /// Intersection combinator branches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<SchemaNode>>,

    /// Union combinator branches (exclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaNode>>,

    /// Union combinator branches (inclusive; resolved identically to `oneOf`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaNode>>,

    /// Union narrowing metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
}

impl SchemaNode {
    /// The declared primitive kind, if any.
    pub fn kind(&self) -> Option<SchemaKind> {
        self.type_tag.kind
    }

    /// True when the node admits `null` (3.0 flag or 3.1 type union).
    pub fn is_nullable(&self) -> bool {
        self.nullable || self.type_tag.null
    }

    /// True when the node is a `$ref` pointer.
    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// True when the node carries any combinator branch list.
    pub fn has_combinators(&self) -> bool {
        self.all_of.is_some() || self.one_of.is_some() || self.any_of.is_some()
    }

    /// True when the node declares enumeration values.
    pub fn is_enumerated(&self) -> bool {
        self.enum_values
            .as_ref()
            .is_some_and(|values| !values.is_empty())
    }

    /// True for the "plain object" fast path of top-level generation:
    /// a non-ref, non-nullable, non-enumerated object shape without
    /// combinators.
    pub fn is_plain_object(&self) -> bool {
        !self.is_reference()
            && !self.has_combinators()
            && !self.is_enumerated()
            && !self.is_nullable()
            && self.items.is_none()
            && (self.kind() == Some(SchemaKind::Object)
                || (self.kind().is_none()
                    && (!self.properties.is_empty() || self.additional_properties.is_some())))
    }
}

/// A media type entry inside a response/request body `content` map.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaObject {
    /// The payload schema, when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
}

/// A named response or request body component.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BodyObject {
    /// Human description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Media type -> payload schema map.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaObject>,
}

impl BodyObject {
    /// Extracts the body schema: prefers a JSON-compatible media type, then
    /// falls back to the first entry that declares a schema.
    pub fn body_schema(&self) -> Option<&SchemaNode> {
        let json_entry = self.content.iter().find_map(|(media, object)| {
            if media.contains("json") {
                object.schema.as_ref()
            } else {
                None
            }
        });
        json_entry.or_else(|| self.content.values().find_map(|object| object.schema.as_ref()))
    }
}

/// A named parameter component.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParameterObject {
    /// Parameter name as used in the route/query.
    pub name: String,
    /// Parameter location (`query`, `path`, `header`, `cookie`).
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Whether the parameter is mandatory.
    pub required: bool,
    /// The parameter schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
}

/// The `components` section of one document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Components {
    /// Data schemas.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaNode>,
    /// Reusable responses.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, BodyObject>,
    /// Reusable parameters.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParameterObject>,
    /// Reusable request bodies.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub request_bodies: IndexMap<String, BodyObject>,
}

/// One loaded API description document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpecDocument {
    /// OpenAPI version string (3.x).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,
    /// Swagger version string (2.0 legacy).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swagger: Option<String>,
    /// Component sections (OAS 3.x).
    pub components: Components,
    /// Legacy Swagger 2.0 schema section; folded into `schemas()` lookups.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, SchemaNode>,
}

impl SpecDocument {
    /// Looks up a named data schema, covering both `components/schemas` and
    /// the legacy `definitions` section.
    pub fn schema(&self, name: &str) -> Option<&SchemaNode> {
        self.components
            .schemas
            .get(name)
            .or_else(|| self.definitions.get(name))
    }

    /// Iterates all named data schemas in declaration order
    /// (`components/schemas` first, then legacy `definitions`).
    pub fn schemas(&self) -> impl Iterator<Item = (&String, &SchemaNode)> {
        self.components
            .schemas
            .iter()
            .chain(self.definitions.iter())
    }
}

/// Ordered set of loaded documents, keyed by a caller-chosen document key
/// (normally the path or URI the document was loaded from).
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    docs: IndexMap<String, SpecDocument>,
}

impl DocumentSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parsed document. Duplicate keys are an error.
    pub fn register(&mut self, key: &str, doc: SpecDocument) -> GenResult<()> {
        if self.docs.contains_key(key) {
            return Err(GenError::General(format!(
                "Document key collision: '{}' is already registered",
                key
            )));
        }
        self.docs.insert(key.to_string(), doc);
        Ok(())
    }

    /// Parses and registers a YAML document.
    pub fn register_yaml(&mut self, key: &str, yaml: &str) -> GenResult<()> {
        let doc: SpecDocument = serde_yaml::from_str(yaml).map_err(|e| {
            GenError::General(format!("Failed to parse document '{}': {}", key, e))
        })?;
        self.register(key, doc)
    }

    /// Parses and registers a JSON document.
    pub fn register_json(&mut self, key: &str, json: &str) -> GenResult<()> {
        let doc: SpecDocument = serde_json::from_str(json).map_err(|e| {
            GenError::General(format!("Failed to parse document '{}': {}", key, e))
        })?;
        self.register(key, doc)
    }

    /// Returns a registered document.
    pub fn get(&self, key: &str) -> Option<&SpecDocument> {
        self.docs.get(key)
    }

    /// True when `key` names a registered document.
    pub fn contains(&self, key: &str) -> bool {
        self.docs.contains_key(key)
    }

    /// The first registered document key, in registration order.
    pub fn first_key(&self) -> Option<&str> {
        self.docs.keys().next().map(String::as_str)
    }

    /// Iterates registered documents in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpecDocument)> {
        self.docs.iter()
    }

    /// Mutable access to one document, for the pre-passes.
    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut SpecDocument> {
        self.docs.get_mut(key)
    }

    /// Runs the two whole-set pre-passes, in order: discriminator
    /// propagation, then the all-of pre-merge. Must be called once, before
    /// any resolution begins; resolution assumes a stable, already-flattened
    /// graph.
    pub fn prepare(&mut self) -> GenResult<()> {
        crate::passes::discriminator::propagate_discriminators(self)?;
        crate::passes::all_of::merge_all_of(self)
    }
}

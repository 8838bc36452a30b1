//! Entity documents for the Atlan catalog API.
//!
//! Every builder emits the envelope
//! `{"entities": [{"typeName", "attributes", "relationshipAttributes"?}]}`.
//! Qualified names join parent identifiers with `/`; relationships point at
//! the related entity by its unique qualified name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Result, options::Style, render, ser};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseRecord {
    pub connector_name: String,
    pub connection_qualified_name: String,
    pub database_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRecord {
    pub connector_name: String,
    pub connection_qualified_name: String,
    pub database_name: String,
    pub schema_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRecord {
    pub connector_name: String,
    pub connection_qualified_name: String,
    pub database_name: String,
    pub schema_name: String,
    #[serde(default)]
    pub input_table_qualified_names: Vec<String>,
    #[serde(default)]
    pub output_table_qualified_names: Vec<String>,
}

/// Process keyed by its connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProcess {
    pub name: String,
    pub qualified_name: String,
    pub connector_name: String,
    pub connection_name: String,
    pub connection_qualified_name: String,
    #[serde(default)]
    pub input_table_qualified_names: Vec<String>,
    #[serde(default)]
    pub output_table_qualified_names: Vec<String>,
}

/// Process keyed by a base qualified name, with input and output names that
/// are not restricted to tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseProcess {
    pub name: String,
    pub qualified_name: String,
    pub connector_name: String,
    pub connection_name: String,
    pub base_qualified_name: String,
    #[serde(default)]
    pub input_qualified_names: Vec<String>,
    #[serde(default)]
    pub output_qualified_names: Vec<String>,
}

/// The two field-naming conventions a process record comes in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessRecord {
    Connection(ConnectionProcess),
    Base(BaseProcess),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityDocument {
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub type_name: &'static str,
    pub attributes: BTreeMap<&'static str, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_attributes: Option<BTreeMap<&'static str, Related>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Related {
    One(EntityRef),
    Many(Vec<EntityRef>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub type_name: &'static str,
    pub unique_attributes: UniqueAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueAttributes {
    pub qualified_name: String,
}

impl EntityRef {
    fn new(type_name: &'static str, qualified_name: impl Into<String>) -> Self {
        Self {
            type_name,
            unique_attributes: UniqueAttributes {
                qualified_name: qualified_name.into(),
            },
        }
    }
}

pub fn qualified_name<S: AsRef<str>>(parts: &[S]) -> String {
    parts.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join("/")
}

/// Text after the last `/`, or the whole name when there is none.
pub fn leaf_name(qualified_name: &str) -> &str {
    qualified_name.rsplit('/').next().unwrap_or(qualified_name)
}

fn attributes<const N: usize>(pairs: [(&'static str, String); N]) -> BTreeMap<&'static str, String> {
    pairs.into_iter().collect()
}

pub fn database_document(obj: &DatabaseRecord) -> EntityDocument {
    let database_qn = qualified_name(&[&obj.connection_qualified_name, &obj.database_name]);
    EntityDocument {
        entities: vec![Entity {
            type_name: "Database",
            attributes: attributes([
                ("name", obj.database_name.clone()),
                ("qualifiedName", database_qn),
                ("connectorName", obj.connector_name.clone()),
                ("connectionQualifiedName", obj.connection_qualified_name.clone()),
            ]),
            relationship_attributes: None,
        }],
    }
}

pub fn schema_document(obj: &SchemaRecord) -> EntityDocument {
    let database_qn = qualified_name(&[&obj.connection_qualified_name, &obj.database_name]);
    let schema_qn = qualified_name(&[&database_qn, &obj.schema_name]);
    EntityDocument {
        entities: vec![Entity {
            type_name: "Schema",
            attributes: attributes([
                ("name", obj.schema_name.clone()),
                ("qualifiedName", schema_qn),
                ("connectorName", obj.connector_name.clone()),
                ("databaseName", obj.database_name.clone()),
                ("databaseQualifiedName", database_qn.clone()),
                ("connectionQualifiedName", obj.connection_qualified_name.clone()),
            ]),
            relationship_attributes: Some(BTreeMap::from([(
                "database",
                Related::One(EntityRef::new("Database", database_qn)),
            )])),
        }],
    }
}

/// One `Table` entity per input name followed by one per output name.
pub fn table_document(obj: &TableRecord) -> EntityDocument {
    let database_qn = qualified_name(&[&obj.connection_qualified_name, &obj.database_name]);
    let schema_qn = qualified_name(&[&database_qn, &obj.schema_name]);
    let entities = obj
        .input_table_qualified_names
        .iter()
        .chain(&obj.output_table_qualified_names)
        .map(|table_qn| Entity {
            type_name: "Table",
            attributes: attributes([
                ("name", leaf_name(table_qn).to_string()),
                ("qualifiedName", table_qn.clone()),
                ("connectorName", obj.connector_name.clone()),
                ("schemaName", obj.schema_name.clone()),
                ("schemaQualifiedName", schema_qn.clone()),
                ("databaseName", obj.database_name.clone()),
                ("databaseQualifiedName", database_qn.clone()),
                ("connectionQualifiedName", obj.connection_qualified_name.clone()),
            ]),
            relationship_attributes: Some(BTreeMap::from([(
                "atlanSchema",
                Related::One(EntityRef::new("Schema", schema_qn.clone())),
            )])),
        })
        .collect();
    EntityDocument { entities }
}

fn table_refs(names: &[String]) -> Related {
    Related::Many(names.iter().map(|n| EntityRef::new("Table", n.as_str())).collect())
}

pub fn process_document(obj: &ProcessRecord) -> EntityDocument {
    let (attrs, inputs, outputs) = match obj {
        ProcessRecord::Connection(p) => (
            attributes([
                ("name", p.name.clone()),
                ("qualifiedName", p.qualified_name.clone()),
                ("connectorName", p.connector_name.clone()),
                ("connectionName", p.connection_name.clone()),
                ("connectionQualifiedName", p.connection_qualified_name.clone()),
            ]),
            &p.input_table_qualified_names,
            &p.output_table_qualified_names,
        ),
        ProcessRecord::Base(p) => (
            attributes([
                ("name", p.name.clone()),
                ("qualifiedName", p.qualified_name.clone()),
                ("connectorName", p.connector_name.clone()),
                ("connectionName", p.connection_name.clone()),
                ("baseQualifiedName", p.base_qualified_name.clone()),
            ]),
            &p.input_qualified_names,
            &p.output_qualified_names,
        ),
    };
    EntityDocument {
        entities: vec![Entity {
            type_name: "Process",
            attributes: attrs,
            relationship_attributes: Some(BTreeMap::from([
                ("inputs", table_refs(inputs)),
                ("outputs", table_refs(outputs)),
            ])),
        }],
    }
}

/// Renders a document with the shared sorted-key renderer. Documents are
/// not normalized: empty relationship arrays are part of the payload.
pub fn render_document(doc: &EntityDocument, style: Style) -> Result<String> {
    let value = ser::to_value(doc)?;
    render::to_string(&value, style)
}

pub fn to_atlan_database(obj: &DatabaseRecord, style: Style) -> Result<String> {
    render_document(&database_document(obj), style)
}

pub fn to_atlan_schema(obj: &SchemaRecord, style: Style) -> Result<String> {
    render_document(&schema_document(obj), style)
}

pub fn to_atlan_table(obj: &TableRecord, style: Style) -> Result<String> {
    render_document(&table_document(obj), style)
}

pub fn to_atlan_process(obj: &ProcessRecord, style: Style) -> Result<String> {
    render_document(&process_document(obj), style)
}

#![allow(dead_code)]

use grid_filter::{CompiledQuery, CompilerConfig, GridQueryCompiler, GridRequest};
use model::{
    core::data_type::SqlDialect,
    filter::FilterDescriptor,
    listing::ListingTarget,
    schema::ClassSchema,
};
use serde_json::json;

pub const CAR_SCHEMA: &str = r#"{
    "id": "CAR",
    "name": "Car",
    "fields": [
        { "name": "name", "type": "input" },
        { "name": "price", "type": "numeric" },
        { "name": "sold", "type": "checkbox" },
        { "name": "color", "type": "select" },
        { "name": "slug", "type": "urlSlug" },
        { "name": "localizedfields", "type": "localizedfields",
          "children": [ { "name": "description", "type": "textarea" } ] },
        { "name": "attributes", "type": "classificationstore",
          "keys": [
            { "id": 2, "groupIds": [1], "definition": { "name": "weight", "type": "numeric" } },
            { "id": 3, "groupIds": [1], "definition": { "name": "trim", "type": "input" } }
          ] },
        { "name": "specs", "type": "classificationstore", "localized": true,
          "keys": [ { "id": 9, "definition": { "name": "doors", "type": "numeric" } } ] },
        { "name": "bricks", "type": "objectbricks", "allowed": ["Engine"] }
    ],
    "bricks": [
        { "key": "Engine", "containerField": "bricks",
          "fields": [
            { "name": "power", "type": "numeric" },
            { "name": "localizedfields", "type": "localizedfields",
              "children": [ { "name": "label", "type": "input" } ] }
          ] }
    ]
}"#;

pub fn car_schema() -> ClassSchema {
    ClassSchema::from_json(CAR_SCHEMA).unwrap()
}

pub fn filters(value: serde_json::Value) -> Vec<FilterDescriptor> {
    FilterDescriptor::parse_list(&value.to_string()).unwrap()
}

pub fn compile_with(dialect: SqlDialect, request: GridRequest) -> CompiledQuery {
    let compiler =
        GridQueryCompiler::new(CompilerConfig::default().with_dialect(dialect)).unwrap();
    compiler.compile(&car_schema(), &request).unwrap()
}

/// Compiles car filters on MySQL without language, sort or paging.
pub fn compile_filters(value: serde_json::Value) -> CompiledQuery {
    let request = GridRequest::new(ListingTarget::object("CAR")).with_filters(filters(value));
    compile_with(SqlDialect::MySql, request)
}

pub fn no_filters() -> serde_json::Value {
    json!([])
}

//! IR Builder, the largest component by line share.
//!
//! Single public entry point, [`build`], folding a parsed AST into a frozen
//! [`Template`]. Everything here is a pure, synchronous transform: read the
//! whole proto stream into a string, parse it, then walk declarations in
//! order, mutating a [`TemplateBuilder`] as we go.

use std::io::Read;

use tracing::warn;

use crate::ast::{Declaration, MapField, MessageEntry};
use crate::model::{Attribute, Enum, EnumMember, Method, Struct, Template, TemplateBuilder};
use crate::naming::{resolve_scalar, to_upper_camel};
use crate::parser::{self, ParseError};

#[derive(Debug, thiserror::Error)]
pub enum IrError {
    #[error("error reading input: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

const EMPTY_TYPE: &str = "google.protobuf.Empty";

/// Folds a `.proto` byte stream into a frozen [`Template`]. `extra_imports`
/// come from the configuration file and are seeded into the Template's
/// Imports before any declaration is visited.
pub fn build<R: Read>(extra_imports: Vec<String>, mut proto_stream: R) -> Result<Template, IrError> {
    let mut source = String::new();
    proto_stream.read_to_string(&mut source)?;
    let proto = parser::parse(&source)?;

    let mut builder = TemplateBuilder::new(extra_imports);

    for declaration in proto.declarations {
        match declaration {
            Declaration::Package(name) => builder.set_package_if_unset(name),
            Declaration::Syntax(_) | Declaration::Import(_) => {}
            Declaration::Message(message) => {
                let name = to_upper_camel(&message.name);
                let mut attributes = Vec::with_capacity(message.fields.len());
                for entry in message.fields {
                    match entry {
                        MessageEntry::Field(field) => {
                            let resolved = resolve_scalar(&field.type_literal);
                            if let Some(import) = resolved.import {
                                builder.add_import(import);
                            }
                            attributes.push(Attribute {
                                name: to_upper_camel(&field.name),
                                raw_name: field.name,
                                type_expression: resolved.expression,
                                optional: field.optional,
                                repeated: field.repeated,
                            });
                        }
                        MessageEntry::MapField(map_field) => {
                            attributes.push(resolve_map_field(map_field));
                        }
                        MessageEntry::Unsupported(kind) => {
                            warn!(message = %message.name, kind = %kind, "unsupported message attribute, skipping");
                        }
                    }
                }
                builder.push_struct(Struct { name, attributes });
            }
            Declaration::Enum(e) => {
                builder.push_enum(Enum {
                    name: e.name,
                    members: e
                        .members
                        .into_iter()
                        .map(|m| EnumMember {
                            name: m.name,
                            index: m.index,
                        })
                        .collect(),
                });
            }
            Declaration::Service(service) => {
                for kind in &service.unsupported {
                    warn!(service = %service.name, kind = %kind, "unsupported service body entry, skipping");
                }
                for rpc in service.rpcs {
                    let (method, import) = resolve_method(rpc);
                    if let Some(import) = import {
                        builder.add_import(import);
                    }
                    builder.push_method(method);
                }
            }
        }
    }

    Ok(builder.build())
}

/// Resolves a map field's attribute. The value side is looked up using the
/// value type literal, not the key literal, so that the generated type
/// actually reflects what the map holds.
fn resolve_map_field(map_field: MapField) -> Attribute {
    let key = resolve_scalar(&map_field.key_type);
    let value = resolve_scalar(&map_field.value_type);
    Attribute {
        name: to_upper_camel(&map_field.name),
        raw_name: map_field.name,
        type_expression: format!("std::collections::HashMap<{}, {}>", key.expression, value.expression),
        optional: false,
        repeated: false,
    }
}

fn resolve_method(rpc: crate::ast::Rpc) -> (Method, Option<&'static str>) {
    let input = camelize_unless_dotted(&rpc.request_type);

    if rpc.response_type == EMPTY_TYPE {
        let method = Method {
            name: to_upper_camel(&rpc.name),
            input,
            has_output: false,
            output: String::new(),
        };
        (method, None)
    } else {
        let (output, import) = if rpc.response_type == "google.protobuf.Timestamp" {
            let resolved = resolve_scalar(&rpc.response_type);
            (resolved.expression, resolved.import)
        } else {
            (to_upper_camel(&rpc.response_type), None)
        };
        let method = Method {
            name: to_upper_camel(&rpc.name),
            input,
            has_output: true,
            output,
        };
        (method, import)
    }
}

fn camelize_unless_dotted(type_name: &str) -> String {
    if type_name.contains('.') {
        type_name.to_owned()
    } else {
        to_upper_camel(type_name)
    }
}

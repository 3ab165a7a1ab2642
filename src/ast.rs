//! Abstract syntax produced by the [`crate::parser`] from a `.proto` byte stream.
//!
//! This is intentionally a thin, language-neutral surface: the IR builder is the
//! only consumer, and it is the only place that knows about target-language
//! conventions. The parser itself never re-cases identifiers or resolves types.

/// One top-level declaration in a `.proto` file, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Syntax(String),
    Package(String),
    Import(String),
    Message(Message),
    Enum(Enum),
    Service(Service),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub name: String,
    pub fields: Vec<MessageEntry>,
}

/// A single entry inside a `message { ... }` body.
///
/// Nested messages, `oneof`, `reserved`, and `option` statements are parsed far
/// enough to be skipped cleanly but are not represented here; the parser emits
/// [`Declaration`] diagnostics for them via its warning sink instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEntry {
    Field(Field),
    MapField(MapField),
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub type_literal: String,
    pub optional: bool,
    pub repeated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapField {
    pub name: String,
    pub key_type: String,
    pub value_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    pub name: String,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub index: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    pub rpcs: Vec<Rpc>,
    /// Names of service-body entries that were not an `rpc`, preserved for the
    /// IR builder's warning log.
    pub unsupported: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rpc {
    pub name: String,
    pub request_type: String,
    pub response_type: String,
}

/// A parsed `.proto` file: declarations in the order they appeared in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proto {
    pub declarations: Vec<Declaration>,
}

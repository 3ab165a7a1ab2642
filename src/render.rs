//! Renderer.
//!
//! Instantiates a single embedded template (`templates/bus.rs.askama`,
//! compiled into the binary by `askama`'s derive macro, the spiritual
//! equivalent of the original's `//go:embed`) against a *view* built from the
//! frozen [`Template`]. Deduplication of methods and of input-type
//! discriminants happens here, as plain Rust, before the template ever sees
//! the data. The template itself carries no "process-once" state.

use askama::Template as AskamaTemplate;

use crate::model::{self, Template};

/// Custom filters for `templates/bus.rs.askama`. Askama looks these up by
/// name in a sibling `mod filters`; `snake` is the one identifier-casing
/// helper the template needs (struct/enum display names arrive already
/// `UpperCamel`; Rust field and method names want `snake_case`).
mod filters {
    use heck::ToSnakeCase;

    pub fn snake(s: &str) -> askama::Result<String> {
        Ok(s.to_snake_case())
    }
}

#[derive(Debug, Clone)]
pub struct AttributeView {
    pub field_name: String,
    pub raw_name: String,
    pub rust_type: String,
}

#[derive(Debug, Clone)]
pub struct StructView {
    pub name: String,
    pub attributes: Vec<AttributeView>,
}

#[derive(Debug, Clone)]
pub struct EnumMemberView {
    pub name: String,
    pub index: String,
}

#[derive(Debug, Clone)]
pub struct EnumView {
    pub name: String,
    pub members: Vec<EnumMemberView>,
}

#[derive(Debug, Clone)]
pub struct MethodView {
    pub name: String,
    pub input: String,
    pub has_output: bool,
    pub output: String,
    /// True when `output` is itself one of the bus's declared input types,
    /// meaning the dispatcher can re-publish the handler's result. A handler
    /// whose output type has no discriminant of its own has nowhere to
    /// publish to and is invoked for effect only.
    pub republish: bool,
}

/// All methods whose input type is `type_name`, in schema order, the
/// discriminant the generated bus dispatches on.
#[derive(Debug, Clone)]
pub struct DiscriminantView {
    pub type_name: String,
    pub handlers: Vec<MethodView>,
}

#[derive(AskamaTemplate, Debug, Clone)]
#[template(path = "bus.rs.askama", escape = "none")]
pub struct BusView {
    pub package: String,
    pub imports: Vec<String>,
    pub enums: Vec<EnumView>,
    pub structs: Vec<StructView>,
    /// One entry per *unique* method name, the Service trait's surface.
    pub methods: Vec<MethodView>,
    /// One entry per *unique* input type, the bus's closed discriminant set.
    pub discriminants: Vec<DiscriminantView>,
}

impl BusView {
    pub fn from_template(template: &Template) -> Self {
        let discriminant_types: std::collections::HashSet<&str> =
            template.methods.iter().map(|m| m.input.as_str()).collect();
        BusView {
            package: template.package.clone(),
            imports: template.imports.clone(),
            enums: template.enums.iter().map(enum_view).collect(),
            structs: template.structs.iter().map(struct_view).collect(),
            methods: dedupe_methods(&template.methods),
            discriminants: group_by_input(&template.methods, &discriminant_types),
        }
    }
}

fn enum_view(e: &model::Enum) -> EnumView {
    EnumView {
        name: e.name.clone(),
        members: e
            .members
            .iter()
            .map(|m| EnumMemberView {
                name: m.name.clone(),
                index: m.index.clone(),
            })
            .collect(),
    }
}

fn struct_view(s: &model::Struct) -> StructView {
    StructView {
        name: s.name.clone(),
        attributes: s.attributes.iter().map(attribute_view).collect(),
    }
}

fn attribute_view(a: &model::Attribute) -> AttributeView {
    let rust_type = if a.repeated {
        format!("Vec<{}>", a.type_expression)
    } else if a.optional {
        format!("Option<{}>", a.type_expression)
    } else {
        a.type_expression.clone()
    };

    AttributeView {
        field_name: a.name.clone(),
        raw_name: a.raw_name.clone(),
        rust_type,
    }
}

/// Pre-filters the method list down to one entry per unique name, in
/// first-seen order. This is the Service trait's surface. Consistency has
/// already been checked by this point, so every occurrence of a name agrees.
fn dedupe_methods(methods: &[model::Method]) -> Vec<MethodView> {
    let mut seen = std::collections::HashSet::new();
    methods
        .iter()
        .filter(|m| seen.insert(m.name.clone()))
        .map(|m| method_view(m, &std::collections::HashSet::new()))
        .collect()
}

/// Groups methods by input type, preserving first-seen type order. This is
/// the bus's closed discriminant set. A type can have more than one handler
/// (for example, one input type consumed by two different RPCs); all of them
/// run when that discriminant is dispatched, in schema order.
fn group_by_input(methods: &[model::Method], discriminant_types: &std::collections::HashSet<&str>) -> Vec<DiscriminantView> {
    let mut groups: Vec<DiscriminantView> = Vec::new();
    for method in methods {
        if let Some(group) = groups.iter_mut().find(|g| g.type_name == method.input) {
            if !group.handlers.iter().any(|h| h.name == method.name) {
                group.handlers.push(method_view(method, discriminant_types));
            }
        } else {
            groups.push(DiscriminantView {
                type_name: method.input.clone(),
                handlers: vec![method_view(method, discriminant_types)],
            });
        }
    }
    groups
}

fn method_view(m: &model::Method, discriminant_types: &std::collections::HashSet<&str>) -> MethodView {
    MethodView {
        name: m.name.clone(),
        input: m.input.clone(),
        has_output: m.has_output,
        output: m.output.clone(),
        republish: m.has_output && discriminant_types.contains(m.output.as_str()),
    }
}

/// Renders `template` to unformatted Rust source text.
pub fn render(template: &Template) -> Result<String, askama::Error> {
    BusView::from_template(template).render()
}

#[cfg(feature = "format")]
/// Passes rendered source through `rustfmt`'s algorithm via `prettyplease`,
/// the same formatter this codebase's own build-script library uses to turn
/// generated token streams into readable output. Parse failure here means the
/// template produced invalid Rust and is always a generator bug, never a
/// schema problem.
pub fn format_rust(source: &str) -> Result<String, syn::Error> {
    let file = syn::parse_file(source)?;
    Ok(prettyplease::unparse(&file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, Enum, EnumMember, Method, Struct};

    fn sample_template() -> Template {
        Template {
            package: "types".into(),
            structs: vec![Struct {
                name: "TypeRequest".into(),
                attributes: vec![Attribute {
                    name: "Name".into(),
                    raw_name: "name".into(),
                    type_expression: "String".into(),
                    optional: false,
                    repeated: false,
                }],
            }],
            methods: vec![
                Method {
                    name: "HelloType".into(),
                    input: "TypeRequest".into(),
                    has_output: false,
                    output: String::new(),
                },
                Method {
                    name: "HelloTime".into(),
                    input: "TypeRequest".into(),
                    has_output: true,
                    output: "time::OffsetDateTime".into(),
                },
            ],
            enums: vec![Enum {
                name: "Status".into(),
                members: vec![EnumMember {
                    name: "SUCCESS".into(),
                    index: "0".into(),
                }],
            }],
            imports: vec!["time".into()],
        }
    }

    #[test]
    fn discriminants_group_multiple_handlers_for_one_input_type() {
        let view = BusView::from_template(&sample_template());
        assert_eq!(view.discriminants.len(), 1);
        assert_eq!(view.discriminants[0].type_name, "TypeRequest");
        assert_eq!(view.discriminants[0].handlers.len(), 2);
    }

    #[test]
    fn methods_are_deduplicated_by_name() {
        let mut tmpl = sample_template();
        tmpl.methods.push(Method {
            name: "HelloType".into(),
            input: "TypeRequest".into(),
            has_output: false,
            output: String::new(),
        });
        let view = BusView::from_template(&tmpl);
        assert_eq!(view.methods.iter().filter(|m| m.name == "HelloType").count(), 1);
    }

    #[test]
    fn renders_without_error() {
        let rendered = render(&sample_template()).expect("template should render");
        assert!(rendered.contains("pub struct TypeRequest"));
        assert!(rendered.contains("pub enum Envelope"));
        assert!(rendered.contains("trait Service"));
    }

    #[test]
    fn handler_output_not_in_discriminant_set_is_not_republished() {
        // HelloTime's output is `time::OffsetDateTime`, which is never a
        // declared input type in this schema, so it has no `From<_> for
        // Envelope` impl and must not be passed to `publish`.
        let view = BusView::from_template(&sample_template());
        let handlers = &view.discriminants[0].handlers;
        let hello_time = handlers.iter().find(|h| h.name == "HelloTime").unwrap();
        assert!(hello_time.has_output);
        assert!(!hello_time.republish);

        let rendered = render(&sample_template()).expect("template should render");
        assert!(rendered.contains("let _ = service.hello_time"));
        assert!(!rendered.contains("let output = service.hello_time"));
    }

    #[test]
    fn handler_output_in_discriminant_set_is_republished() {
        let mut tmpl = sample_template();
        tmpl.structs.push(Struct {
            name: "TypeResponse".into(),
            attributes: vec![],
        });
        tmpl.methods.push(Method {
            name: "Forward".into(),
            input: "TypeResponse".into(),
            has_output: false,
            output: String::new(),
        });
        tmpl.methods[1].output = "TypeResponse".into();

        let view = BusView::from_template(&tmpl);
        let handlers = &view
            .discriminants
            .iter()
            .find(|d| d.type_name == "TypeRequest")
            .unwrap()
            .handlers;
        let hello_time = handlers.iter().find(|h| h.name == "HelloTime").unwrap();
        assert!(hello_time.republish);
    }

    #[test]
    fn optional_and_repeated_wrap_the_scalar_type() {
        let mut tmpl = sample_template();
        tmpl.structs[0].attributes.push(Attribute {
            name: "Tags".into(),
            raw_name: "tags".into(),
            type_expression: "String".into(),
            optional: false,
            repeated: true,
        });
        tmpl.structs[0].attributes.push(Attribute {
            name: "Nickname".into(),
            raw_name: "nickname".into(),
            type_expression: "String".into(),
            optional: true,
            repeated: false,
        });
        let view = BusView::from_template(&tmpl);
        let attrs = &view.structs[0].attributes;
        assert_eq!(attrs[1].rust_type, "Vec<String>");
        assert_eq!(attrs[2].rust_type, "Option<String>");
    }
}

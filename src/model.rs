//! The Template Model: the generator's sole intermediate representation.
//!
//! Split into a mutable `TemplateBuilder`, populated by [`crate::ir`] while
//! walking the AST, and a frozen `Template`, consumed by the checker and the
//! renderer. Neither the checker nor the renderer can mutate a `Template`;
//! there is no `&mut` path back into it once `TemplateBuilder::build` returns.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub raw_name: String,
    pub type_expression: String,
    pub optional: bool,
    pub repeated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Struct {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub input: String,
    pub has_output: bool,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub index: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    pub name: String,
    pub members: Vec<EnumMember>,
}

/// The frozen Template Model handed to the consistency checker and renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    pub package: String,
    pub structs: Vec<Struct>,
    pub methods: Vec<Method>,
    pub enums: Vec<Enum>,
    pub imports: Vec<String>,
}

/// The mutable assembly state used only inside the IR builder.
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    package: Option<String>,
    structs: Vec<Struct>,
    methods: Vec<Method>,
    enums: Vec<Enum>,
    imports: Vec<String>,
}

impl TemplateBuilder {
    pub fn new(extra_imports: Vec<String>) -> Self {
        let mut builder = TemplateBuilder::default();
        for import in extra_imports {
            builder.add_import(import);
        }
        builder
    }

    /// Sets the package name, but only on the first call: the first
    /// `package` declaration wins.
    pub fn set_package_if_unset(&mut self, name: String) {
        if self.package.is_none() {
            self.package = Some(name);
        }
    }

    pub fn push_struct(&mut self, s: Struct) {
        self.structs.push(s);
    }

    pub fn push_method(&mut self, m: Method) {
        self.methods.push(m);
    }

    pub fn push_enum(&mut self, e: Enum) {
        self.enums.push(e);
    }

    /// Deduplicated, insertion-ordered import list.
    pub fn add_import(&mut self, import: impl Into<String>) {
        let import = import.into();
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
    }

    /// Freezes the builder into a `Template`, applying the enum-reference
    /// post-pass: any Attribute whose type expression names a declared enum
    /// is rewritten to `<EnumName>Enum`.
    pub fn build(self) -> Template {
        let enum_names: std::collections::HashSet<&str> =
            self.enums.iter().map(|e| e.name.as_str()).collect();

        let structs = self
            .structs
            .into_iter()
            .map(|mut s| {
                for attr in &mut s.attributes {
                    if enum_names.contains(attr.type_expression.as_str()) {
                        attr.type_expression = format!("{}Enum", attr.type_expression);
                    }
                }
                s
            })
            .collect();

        Template {
            package: self.package.unwrap_or_default(),
            structs,
            methods: self.methods,
            enums: self.enums,
            imports: self.imports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_package_wins() {
        let mut b = TemplateBuilder::new(vec![]);
        b.set_package_if_unset("first".into());
        b.set_package_if_unset("second".into());
        assert_eq!(b.build().package, "first");
    }

    #[test]
    fn imports_are_deduplicated_and_insertion_ordered() {
        let mut b = TemplateBuilder::new(vec!["a".into()]);
        b.add_import("b");
        b.add_import("a");
        b.add_import("c");
        assert_eq!(b.build().imports, vec!["a", "b", "c"]);
    }

    #[test]
    fn enum_rewrite_runs_as_a_single_post_pass() {
        let mut b = TemplateBuilder::new(vec![]);
        b.push_struct(Struct {
            name: "M".into(),
            attributes: vec![Attribute {
                name: "Status".into(),
                raw_name: "status".into(),
                type_expression: "Status".into(),
                optional: false,
                repeated: false,
            }],
        });
        b.push_enum(Enum {
            name: "Status".into(),
            members: vec![],
        });
        let tmpl = b.build();
        assert_eq!(tmpl.structs[0].attributes[0].type_expression, "StatusEnum");
    }
}

//! Consistency Checker.
//!
//! Runs once, after the IR builder has finished. Groups methods by name and
//! compares every occurrence after the first against that first occurrence,
//! deliberately first-writer-wins, not last-writer-wins, matching the
//! original generator's behavior. This quirk is preserved intentionally
//! rather than fixed.

use std::collections::HashMap;

use crate::model::{Method, Template};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("Method {name} has multiple inputs: {second} | {first}")]
    ConflictingInputs {
        name: String,
        first: String,
        second: String,
    },

    #[error("Method {name} has multiple return signatures")]
    ConflictingReturnSignature { name: String },

    #[error("Method {name} has multiple outputs: {second} | {first}")]
    ConflictingOutputs {
        name: String,
        first: String,
        second: String,
    },
}

/// Checks that every method name in `template` has a single, consistent
/// signature across all services. Tie-break order is input, then has-output,
/// then output; the first mismatch found aborts.
pub fn check(template: &Template) -> Result<(), ConflictError> {
    let mut seen: HashMap<&str, &Method> = HashMap::new();

    for method in &template.methods {
        match seen.get(method.name.as_str()) {
            None => {
                seen.insert(&method.name, method);
            }
            Some(first) => {
                if first.input != method.input {
                    return Err(ConflictError::ConflictingInputs {
                        name: method.name.clone(),
                        first: first.input.clone(),
                        second: method.input.clone(),
                    });
                }
                if first.has_output != method.has_output {
                    return Err(ConflictError::ConflictingReturnSignature {
                        name: method.name.clone(),
                    });
                }
                if first.has_output && first.output != method.output {
                    return Err(ConflictError::ConflictingOutputs {
                        name: method.name.clone(),
                        first: first.output.clone(),
                        second: method.output.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, input: &str, has_output: bool, output: &str) -> Method {
        Method {
            name: name.into(),
            input: input.into(),
            has_output,
            output: output.into(),
        }
    }

    fn template_with(methods: Vec<Method>) -> Template {
        Template {
            package: "types".into(),
            structs: vec![],
            methods,
            enums: vec![],
            imports: vec![],
        }
    }

    #[test]
    fn identical_duplicate_methods_are_fine() {
        let tmpl = template_with(vec![
            method("HelloType", "TypeRequest", false, ""),
            method("HelloType", "TypeRequest", false, ""),
        ]);
        assert!(check(&tmpl).is_ok());
    }

    #[test]
    fn conflicting_inputs_report_second_then_first() {
        let tmpl = template_with(vec![
            method("HelloType", "TypeRequestA", false, ""),
            method("HelloType", "TypeRequestB", false, ""),
        ]);
        let err = check(&tmpl).unwrap_err();
        assert_eq!(
            err,
            ConflictError::ConflictingInputs {
                name: "HelloType".into(),
                first: "TypeRequestA".into(),
                second: "TypeRequestB".into(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Method HelloType has multiple inputs: TypeRequestB | TypeRequestA"
        );
    }

    #[test]
    fn conflicting_return_signature_takes_priority_over_output() {
        let tmpl = template_with(vec![
            method("HelloType", "TypeRequest", true, "TypeResponse"),
            method("HelloType", "TypeRequest", false, ""),
        ]);
        let err = check(&tmpl).unwrap_err();
        assert_eq!(err.to_string(), "Method HelloType has multiple return signatures");
    }

    #[test]
    fn conflicting_outputs_reported_when_both_have_output() {
        let tmpl = template_with(vec![
            method("HelloType", "TypeRequest", true, "TypeResponseA"),
            method("HelloType", "TypeRequest", true, "TypeResponseB"),
        ]);
        let err = check(&tmpl).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Method HelloType has multiple outputs: TypeResponseB | TypeResponseA"
        );
    }

    #[test]
    fn third_occurrence_compares_against_first_not_second() {
        // first-writer-wins: A is canonical even after B was inserted as the
        // "current" comparison target by a naive last-writer-wins checker.
        let tmpl = template_with(vec![
            method("HelloType", "TypeRequestA", false, ""),
            method("HelloType", "TypeRequestA", false, ""),
            method("HelloType", "TypeRequestC", false, ""),
        ]);
        let err = check(&tmpl).unwrap_err();
        assert_eq!(
            err,
            ConflictError::ConflictingInputs {
                name: "HelloType".into(),
                first: "TypeRequestA".into(),
                second: "TypeRequestC".into(),
            }
        );
    }
}

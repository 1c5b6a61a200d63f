//! Signature extraction from Python syntax trees.
//!
//! One builder accumulates every signature of a revision scan, so name
//! disambiguation is resolved against everything already extracted in the
//! same scan, across files.

use std::path::Path;

use log::warn;
use rustpython_parser::ast::{self, Ranged};

use crate::core::suffix::Suffix;
use crate::core::{Argument, DefaultValue, Literal, Signature};
use crate::errors::ParseFailure;

use super::parse_module;

/// What a recognized decorator says about a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DecoratorKind {
    PropertyGetter,
    PropertySetter,
    Other,
}

/// Accumulates the public signatures of one revision scan.
#[derive(Debug, Default)]
pub struct SignatureBuilder {
    signatures: Vec<Signature>,
    suffixes: Suffix,
}

impl SignatureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything extracted so far, in extraction order.
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Seal the builder into its signature list.
    pub fn into_signatures(self) -> Vec<Signature> {
        self.signatures
    }

    /// Parse one file's source and append its public signatures.
    pub fn parse_source(&mut self, file: &Path, source: &str) -> Result<(), ParseFailure> {
        let body = parse_module(file, source)?;
        self.collect(&body, file, source);
        Ok(())
    }

    /// Walk module-level functions and methods of (arbitrarily nested)
    /// classes. Function bodies are not descended into; a closure is not
    /// API surface.
    fn collect(&mut self, body: &[ast::Stmt], file: &Path, source: &str) {
        for stmt in body {
            match stmt {
                ast::Stmt::FunctionDef(def) => self.push_signature(def, file, source),
                ast::Stmt::ClassDef(class) => self.collect(&class.body, file, source),
                _ => {}
            }
        }
    }

    fn push_signature(&mut self, def: &ast::StmtFunctionDef, file: &Path, source: &str) {
        let declared = def.name.as_str();
        if is_private(declared) || is_hidden_dunder(declared) {
            return;
        }

        let mut base = format!("{}.{declared}", module_qualifier(file));
        for decorator in &def.decorator_list {
            match classify_decorator(decorator) {
                DecoratorKind::PropertyGetter => base.push_str("#getter"),
                DecoratorKind::PropertySetter => base.push_str("#setter"),
                DecoratorKind::Other => {}
            }
        }
        let name = self.unique_name(base);

        let arguments = def
            .args
            .args
            .iter()
            .chain(def.args.kwonlyargs.iter())
            .map(|arg| build_argument(arg, source))
            .collect();

        self.signatures.push(Signature {
            name,
            file: file.to_path_buf(),
            arguments,
        });
    }

    /// Resolve a collision by drawing markers until the name is free. The
    /// marker sequence is scan-wide and only ever moves forward.
    fn unique_name(&mut self, base: String) -> String {
        let mut candidate = base.clone();
        while self.is_taken(&candidate) {
            candidate = format!("{base}{}", self.suffixes.draw());
        }
        candidate
    }

    fn is_taken(&self, name: &str) -> bool {
        self.signatures.iter().any(|signature| signature.name == name)
    }
}

/// A single leading underscore without a trailing one marks a private
/// declaration.
fn is_private(name: &str) -> bool {
    name.starts_with('_') && !name.ends_with('_')
}

/// Dunder names are skipped except the public constructor and callable.
fn is_hidden_dunder(name: &str) -> bool {
    name.starts_with("__") && !matches!(name, "__init__" | "__call__")
}

/// `<parent directory>.<file stem>`; a file without a parent directory is
/// qualified by its stem alone.
fn module_qualifier(file: &Path) -> String {
    let stem = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    match file.parent().and_then(Path::file_name) {
        Some(directory) => format!("{}.{stem}", directory.to_string_lossy()),
        None => stem,
    }
}

/// Classify one decorator expression. Recognized getter spellings are
/// `property` and `cached_property`, bare or as an attribute tail; a
/// `.setter` attribute marks the setter half of a property pair.
fn classify_decorator(expr: &ast::Expr) -> DecoratorKind {
    match expr {
        ast::Expr::Name(name) if is_property_name(name.id.as_str()) => {
            DecoratorKind::PropertyGetter
        }
        ast::Expr::Attribute(attribute) if attribute.attr.as_str() == "setter" => {
            DecoratorKind::PropertySetter
        }
        ast::Expr::Attribute(attribute) if is_property_name(attribute.attr.as_str()) => {
            DecoratorKind::PropertyGetter
        }
        // Decorator factories classify by the callee.
        ast::Expr::Call(call) => classify_decorator(&call.func),
        _ => DecoratorKind::Other,
    }
}

fn is_property_name(name: &str) -> bool {
    matches!(name, "property" | "cached_property")
}

fn build_argument(arg: &ast::ArgWithDefault, source: &str) -> Argument {
    let default = arg
        .default
        .as_deref()
        .map(|expr| reduce_default(expr, source));
    Argument {
        name: arg.def.arg.to_string(),
        default,
    }
}

/// Reduce a default expression to a structural literal. Anything else is
/// recorded as unrepresentable, keeping the raw source text so a change to
/// the expression still changes the signature.
fn reduce_default(expr: &ast::Expr, source: &str) -> DefaultValue {
    match reduce_literal(expr) {
        Some(value) => DefaultValue::Literal(value),
        None => {
            let raw = source_slice(source, expr);
            warn!("default expression is not a literal: {raw}");
            DefaultValue::Unrepresentable(raw)
        }
    }
}

fn reduce_literal(expr: &ast::Expr) -> Option<Literal> {
    match expr {
        ast::Expr::Constant(constant) => Some(constant_literal(&constant.value)),
        ast::Expr::Tuple(tuple) => collect_literals(&tuple.elts).map(Literal::Tuple),
        ast::Expr::List(list) => collect_literals(&list.elts).map(Literal::List),
        ast::Expr::Set(set) => collect_literals(&set.elts).map(Literal::Set),
        ast::Expr::Dict(dict) => {
            let mut entries = Vec::with_capacity(dict.keys.len());
            for (key, value) in dict.keys.iter().zip(&dict.values) {
                // A `**spread` entry has no key expression.
                let key = reduce_literal(key.as_ref()?)?;
                entries.push((key, reduce_literal(value)?));
            }
            Some(Literal::Dict(entries))
        }
        ast::Expr::UnaryOp(unary) if matches!(unary.op, ast::UnaryOp::USub) => {
            match reduce_literal(&unary.operand)? {
                Literal::Int(digits) => Some(Literal::Int(format!("-{digits}"))),
                Literal::Float(digits) => Some(Literal::Float(format!("-{digits}"))),
                _ => None,
            }
        }
        _ => None,
    }
}

fn collect_literals(elements: &[ast::Expr]) -> Option<Vec<Literal>> {
    elements.iter().map(reduce_literal).collect()
}

fn constant_literal(value: &ast::Constant) -> Literal {
    match value {
        ast::Constant::None => Literal::None,
        ast::Constant::Ellipsis => Literal::Ellipsis,
        ast::Constant::Bool(value) => Literal::Bool(*value),
        ast::Constant::Str(value) => Literal::Str(value.clone()),
        ast::Constant::Bytes(value) => Literal::Bytes(value.clone()),
        ast::Constant::Int(value) => Literal::Int(value.to_string()),
        ast::Constant::Float(value) => Literal::Float(value.to_string()),
        ast::Constant::Complex { real, imag } => Literal::Complex(format!("{real}+{imag}j")),
        ast::Constant::Tuple(items) => {
            Literal::Tuple(items.iter().map(constant_literal).collect())
        }
    }
}

fn source_slice(source: &str, expr: &ast::Expr) -> String {
    let range = expr.range();
    source
        .get(range.start().to_usize()..range.end().to_usize())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use indoc::indoc;

    use super::*;

    fn extract(source: &str) -> Vec<Signature> {
        let mut builder = SignatureBuilder::new();
        builder
            .parse_source(Path::new("pkg/mod.py"), source)
            .unwrap();
        builder.into_signatures()
    }

    #[test]
    fn names_carry_the_module_qualifier() {
        let signatures = extract("def function(n=1):\n    return n\n");
        assert_eq!(signatures.len(), 1);
        assert_eq!(signatures[0].name, "pkg.mod.function");
        assert_eq!(signatures[0].file, PathBuf::from("pkg/mod.py"));
        assert_eq!(
            signatures[0].arguments,
            vec![Argument::new(
                "n",
                Some(DefaultValue::Literal(Literal::Int("1".into()))),
            )]
        );
    }

    #[test]
    fn a_file_without_a_parent_uses_its_stem() {
        let mut builder = SignatureBuilder::new();
        builder
            .parse_source(Path::new("mod.py"), "def f():\n    pass\n")
            .unwrap();
        assert_eq!(builder.signatures()[0].name, "mod.f");
    }

    #[test]
    fn private_and_dunder_names_are_filtered() {
        let source = indoc! {"
            def _hidden():
                pass

            def __repr__(self):
                pass

            class Thing:
                def __init__(self, n):
                    pass

                def __call__(self):
                    pass

                def _internal(self):
                    pass
        "};
        let names: Vec<String> = extract(source).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["pkg.mod.__init__", "pkg.mod.__call__"]);
    }

    #[test]
    fn a_single_underscore_pair_stays_public() {
        let signatures = extract("def _odd_():\n    pass\n");
        assert_eq!(signatures[0].name, "pkg.mod._odd_");
    }

    #[test]
    fn methods_of_nested_classes_are_walked_but_closures_are_not() {
        let source = indoc! {"
            class Outer:
                class Inner:
                    def method(self):
                        pass

            def top():
                def closure():
                    pass
                return closure
        "};
        let names: Vec<String> = extract(source).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["pkg.mod.method", "pkg.mod.top"]);
    }

    #[test]
    fn same_named_declarations_draw_suffixes_in_order() {
        let source = indoc! {"
            def f():
                pass

            def f(n):
                pass

            def f(n, m):
                pass
        "};
        let names: Vec<String> = extract(source).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["pkg.mod.f", "pkg.mod.f(bis)", "pkg.mod.f(ter)"]);
    }

    #[test]
    fn disambiguation_spans_files_within_one_scan() {
        let mut builder = SignatureBuilder::new();
        builder
            .parse_source(Path::new("pkg/mod.py"), "def f():\n    pass\n")
            .unwrap();
        builder
            .parse_source(Path::new("other/mod.py"), "def f():\n    pass\n")
            .unwrap();
        let names: Vec<&str> = builder
            .signatures()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        // Distinct qualifiers, no collision, no marker drawn.
        assert_eq!(names, vec!["pkg.mod.f", "other.mod.f"]);
    }

    #[test]
    fn properties_and_setters_are_marked() {
        let source = indoc! {"
            class Config:
                @property
                def level(self):
                    return self._level

                @level.setter
                def level(self, value):
                    self._level = value

                @functools.cached_property
                def digest(self):
                    return compute(self)
        "};
        let names: Vec<String> = extract(source).into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "pkg.mod.level#getter",
                "pkg.mod.level#setter",
                "pkg.mod.digest#getter",
            ]
        );
    }

    #[test]
    fn trailing_defaults_attach_to_the_right_arguments() {
        let source = "def f(a, b, c=1, *, d, e=2):\n    pass\n";
        let signatures = extract(source);
        assert_eq!(
            signatures[0].arguments,
            vec![
                Argument::new("a", None),
                Argument::new("b", None),
                Argument::new("c", Some(DefaultValue::Literal(Literal::Int("1".into())))),
                Argument::new("d", None),
                Argument::new("e", Some(DefaultValue::Literal(Literal::Int("2".into())))),
            ]
        );
    }

    #[test]
    fn literal_defaults_cover_containers_and_negatives() {
        let source = "def f(a=[1, 2], b=(None, True), c={'k': 1.5}, d=-3):\n    pass\n";
        let arguments = extract(source).remove(0).arguments;
        assert_eq!(
            arguments[0].default,
            Some(DefaultValue::Literal(Literal::List(vec![
                Literal::Int("1".into()),
                Literal::Int("2".into()),
            ])))
        );
        assert_eq!(
            arguments[1].default,
            Some(DefaultValue::Literal(Literal::Tuple(vec![
                Literal::None,
                Literal::Bool(true),
            ])))
        );
        assert_eq!(
            arguments[2].default,
            Some(DefaultValue::Literal(Literal::Dict(vec![(
                Literal::Str("k".into()),
                Literal::Float("1.5".into()),
            )])))
        );
        assert_eq!(
            arguments[3].default,
            Some(DefaultValue::Literal(Literal::Int("-3".into())))
        );
    }

    #[test]
    fn a_non_literal_default_is_unrepresentable_not_fatal() {
        let source = "def f(stamp=now(), n=1):\n    pass\n";
        let arguments = extract(source).remove(0).arguments;
        assert_eq!(
            arguments[0].default,
            Some(DefaultValue::Unrepresentable("now()".to_string()))
        );
        assert_eq!(
            arguments[1].default,
            Some(DefaultValue::Literal(Literal::Int("1".into())))
        );
    }

    #[test]
    fn vararg_and_kwarg_carry_no_signature_weight() {
        let source = "def f(a, *args, **kwargs):\n    pass\n";
        let arguments = extract(source).remove(0).arguments;
        assert_eq!(arguments, vec![Argument::new("a", None)]);
    }
}

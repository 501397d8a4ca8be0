//! Reference renderer
//!
//! Prints a lowered program as C#-shaped source. Members are separated by a
//! blank line; an empty body is a single blank line.

use siglow_types::{Literal, NullableStyle, PrimitiveType};
use std::fmt::Write;

use crate::config::LoweringOptions;
use crate::model::{ForwardArg, ForwardingCall, MethodBody, MethodKind, Modifiers};
use crate::overload::{EmittedOverload, EmittedParam, LoweredField, LoweredTy, LoweredTypeDecl, OverloadBody};
use crate::pass::LoweredProgram;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub nullable_style: NullableStyle,
    pub placeholder: String,
    pub indent: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&LoweringOptions::default())
    }
}

impl From<&LoweringOptions> for RenderOptions {
    fn from(options: &LoweringOptions) -> Self {
        Self {
            nullable_style: options.nullable_style,
            placeholder: options.placeholder.clone(),
            indent: "\t".to_string(),
        }
    }
}

pub fn render_program(program: &LoweredProgram, options: &RenderOptions) -> String {
    let mut out = String::new();
    let mut printer = Printer {
        out: &mut out,
        options,
    };
    printer.program(program);
    out
}

/// Render a single type at the outermost indentation level
pub fn render_type(decl: &LoweredTypeDecl, options: &RenderOptions) -> String {
    let mut out = String::new();
    let mut printer = Printer {
        out: &mut out,
        options,
    };
    printer.type_decl(decl, 0);
    out
}

struct Printer<'a> {
    out: &'a mut String,
    options: &'a RenderOptions,
}

impl Printer<'_> {
    fn program(&mut self, program: &LoweredProgram) {
        if program.namespace.is_empty() {
            for decl in &program.types {
                self.type_decl(decl, 0);
            }
            return;
        }

        self.line(0, &format!("namespace {} {{", program.namespace));
        for decl in &program.types {
            self.type_decl(decl, 1);
        }
        self.line(0, "}");
    }

    fn type_decl(&mut self, decl: &LoweredTypeDecl, depth: usize) {
        self.line(depth, &format!("class {} {{", decl.name));

        let mut first = true;
        for field in &decl.fields {
            if !first {
                self.out.push('\n');
            }
            first = false;
            self.field(field, depth + 1);
        }
        for (position, method) in decl.methods.iter().enumerate() {
            // Spell literals with their slot type when a sibling could win resolution
            let pinned = if decl.has_rival(position) {
                method.canonical()
            } else {
                None
            };
            for overload in &method.overloads {
                if !first {
                    self.out.push('\n');
                }
                first = false;
                self.overload(&decl.name, overload, pinned, depth + 1);
            }
        }

        self.line(depth, "}");
    }

    fn field(&mut self, field: &LoweredField, depth: usize) {
        let mut text = modifiers(field.modifiers);
        text.push_str(&self.ty(&field.ty));
        text.push(' ');
        text.push_str(&field.name);
        if let Some(init) = &field.initializer {
            let _ = write!(text, " = {}", init);
        }
        text.push(';');
        self.line(depth, &text);
    }

    fn overload(
        &mut self,
        owner: &str,
        overload: &EmittedOverload,
        pinned: Option<&EmittedOverload>,
        depth: usize,
    ) {
        let mut header = modifiers(overload.modifiers);
        match overload.kind {
            MethodKind::Constructor => header.push_str(owner),
            MethodKind::Method => {
                match &overload.return_type {
                    Some(ty) => header.push_str(&self.ty(ty)),
                    None => header.push_str("void"),
                }
                header.push(' ');
                header.push_str(&overload.name);
            }
        }

        let params: Vec<String> = overload.params.iter().map(|p| self.param(p)).collect();
        let _ = write!(header, "({})", params.join(", "));

        let chained = match (&overload.kind, &overload.body) {
            (MethodKind::Constructor, OverloadBody::Forward(call)) => Some(call),
            _ => None,
        };
        if let Some(call) = chained {
            let _ = write!(header, " : {}({})", call.target, self.call_args(call, pinned));
        }
        header.push_str(" {");
        self.line(depth, &header);

        let returns = overload.return_type.is_some() && overload.kind == MethodKind::Method;
        match (&overload.body, chained) {
            (_, Some(_)) => self.out.push('\n'),
            (OverloadBody::Forward(call), None) => {
                let call = format!("{}({});", call.target, self.call_args(call, pinned));
                self.line(depth + 1, &if returns { format!("return {}", call) } else { call });
            }
            (OverloadBody::Original(MethodBody::Forward(call)), None) => {
                let call = format!("{}({});", call.target, call.render_args());
                self.line(depth + 1, &if returns { format!("return {}", call) } else { call });
            }
            (OverloadBody::Original(MethodBody::Block(lines)), None) => {
                if lines.is_empty() {
                    self.out.push('\n');
                }
                for line in lines {
                    self.line(depth + 1, line);
                }
            }
        }

        self.line(depth, "}");
    }

    /// Arguments of a synthesized forwarding call. With a pinned canonical
    /// overload, every literal that is not already an exact match for its
    /// slot is cast to the slot type.
    fn call_args(&self, call: &ForwardingCall, pinned: Option<&EmittedOverload>) -> String {
        let Some(canonical) = pinned else {
            return call.render_args();
        };

        call.args
            .iter()
            .enumerate()
            .map(|(i, arg)| match (arg, canonical.params.get(i)) {
                (
                    ForwardArg::Literal {
                        literal,
                        wraps_into_nullable,
                        ..
                    },
                    Some(param),
                ) if *wraps_into_nullable || !exact_literal(literal, &param.ty) => {
                    let value = arg.render();
                    if value.starts_with('-') {
                        format!("({})({})", self.ty(&param.ty), value)
                    } else {
                        format!("({}){}", self.ty(&param.ty), value)
                    }
                }
                _ => arg.render(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn param(&self, param: &EmittedParam) -> String {
        let mut text = format!("{} {}", self.ty(&param.ty), param.name);
        if let Some(default) = &param.native_default {
            let _ = write!(text, " = {}", default);
        }
        text
    }

    fn ty(&self, ty: &LoweredTy) -> String {
        ty.render(self.options.nullable_style, &self.options.placeholder)
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(&self.options.indent);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}

/// Whether the literal's own type already is the slot type
fn exact_literal(literal: &Literal, ty: &LoweredTy) -> bool {
    if ty.is_wrapped() {
        return false;
    }
    match (literal, ty) {
        (Literal::Null, _) => false,
        (Literal::Str(_), LoweredTy::Reference(name)) => name == "String" || name == "string",
        (Literal::Int(_), _) => ty.primitive() == Some(PrimitiveType::Int),
        // Rendered with an `f` suffix on a float slot
        (Literal::Float(_), _) => ty.primitive().is_some_and(PrimitiveType::is_floating),
        (Literal::Bool(_), _) => ty.primitive() == Some(PrimitiveType::Bool),
        (Literal::Char(_), _) => ty.primitive() == Some(PrimitiveType::Char),
        _ => false,
    }
}

fn modifiers(modifiers: Modifiers) -> String {
    let mut text = String::new();
    if let Some(keyword) = modifiers.visibility.keyword() {
        text.push_str(keyword);
        text.push(' ');
    }
    if modifiers.is_static {
        text.push_str("static ");
    }
    text
}

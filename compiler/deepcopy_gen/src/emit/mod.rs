//! Go source emission.
//!
//! Renders the [`TypePlan`]s of one package into a single Go file. Rendering
//! makes no decisions: every strategy was fixed by the resolver, so the
//! emitter only spells them out.
//!
//! Copy code is built from two shapes:
//!
//! - a *value* copy `dst = copy(src)` between two addressable Go
//!   expressions of the same type, guarded against nil where the type is
//!   nil-able
//! - a *slot* copy, where `in` and `out` are pointers to the container and
//!   `*in` is known to be non-nil
//!
//! Walks rebind `in, out := &src, &dst` in a fresh block and continue with
//! a slot copy, which is the shape gofmt users know from deepcopy-gen.

mod imports;
mod writer;

use deepcopy_ir::{PackageId, Receiver, TypeId, Universe};

use self::imports::ImportTracker;
use self::writer::GoWriter;
use crate::strategy::{BodyPlan, CloneReturn, CopyMethods, CopyStrategy, Element, TypePlan};
use crate::tags::InterfaceReceiver;
use crate::GenConfig;

/// Marker line identifying generated files.
pub const GENERATED_MARKER: &str = "// Code generated by deepcopy-gen. DO NOT EDIT.";

/// Render the generated file of `package`.
pub fn render_package(
    universe: &Universe,
    config: &GenConfig,
    package: PackageId,
    plans: &[TypePlan],
) -> String {
    let pkg = universe.package(package);
    let local_names = pkg
        .types
        .iter()
        .filter_map(|&ty| universe.name(ty))
        .map(|name| name.name.as_str());
    let mut emitter = Emitter {
        universe,
        config,
        imports: ImportTracker::new(&pkg.path, local_names),
        out: GoWriter::new(),
    };
    for plan in plans {
        emitter.emit_type(plan);
    }
    let body = emitter.out.take_output();

    let mut file = GoWriter::new();
    if let Some(tag) = &config.build_tag {
        file.line(&format!("//go:build !{tag}"));
        file.blank();
    }
    let header = config.header.trim_end();
    if !header.is_empty() {
        for line in header.lines() {
            file.line(line.trim_end());
        }
        file.blank();
    }
    file.line(GENERATED_MARKER);
    file.blank();
    file.line(&format!("package {}", pkg.name));
    file.blank();

    let imports: Vec<_> = emitter.imports.imports().collect();
    if !imports.is_empty() {
        file.open("import (");
        for (alias, path) in imports {
            file.line(&format!("{alias} {path:?}"));
        }
        file.close_with(")");
        file.blank();
    }

    let mut text = file.take_output();
    text.push_str(&body);
    // Each function is followed by a blank separator; keep exactly one
    // trailing newline.
    let trimmed = text.trim_end().len();
    text.truncate(trimmed);
    text.push('\n');
    text
}

struct Emitter<'a> {
    universe: &'a Universe,
    config: &'a GenConfig,
    imports: ImportTracker,
    out: GoWriter,
}

impl Emitter<'_> {
    fn render(&mut self, ty: TypeId) -> String {
        self.imports.render(self.universe, ty)
    }

    /// Spelling of a generated type as a receiver, with its type parameters.
    fn self_type(&mut self, ty: TypeId) -> String {
        let spelled = self.render(ty);
        let params = &self.universe.node(ty).type_params;
        if params.is_empty() {
            spelled
        } else {
            format!("{spelled}[{}]", params.join(", "))
        }
    }

    fn emit_type(&mut self, plan: &TypePlan) {
        let name = self.self_type(plan.ty);
        let recv = match plan.receiver {
            Receiver::Pointer => format!("*{name}"),
            Receiver::Value => name.clone(),
        };

        if let Some(body) = &plan.body {
            self.out.line(
                "// DeepCopyInto is an autogenerated deepcopy function, copying the receiver, \
                 writing into out. in must be non-nil.",
            );
            self.out
                .open(&format!("func (in {recv}) DeepCopyInto(out *{name}) {{"));
            match body {
                BodyPlan::Struct { fields } => {
                    self.out.line("*out = *in");
                    for field in fields {
                        let src = format!("in.{}", field.name);
                        let dst = format!("out.{}", field.name);
                        self.emit_value(field.ty, &field.strategy, &src, &dst);
                    }
                    self.out.line("return");
                }
                BodyPlan::Shape(strategy) => match plan.receiver {
                    Receiver::Value => {
                        self.out.open("{");
                        self.out.line("in := &in");
                        self.emit_slot(plan.ty, strategy);
                        self.out.line("return");
                        self.out.close();
                    }
                    Receiver::Pointer => {
                        self.emit_slot(plan.ty, strategy);
                        self.out.line("return");
                    }
                },
                BodyPlan::DelegateToClone => match plan.clone_return {
                    CloneReturn::Pointer => {
                        self.out.line("clone := in.DeepCopy()");
                        self.out.line("*out = *clone");
                    }
                    CloneReturn::Value => self.out.line("*out = in.DeepCopy()"),
                },
            }
            self.out.close();
            self.out.blank();
        }

        if plan.emit_clone {
            let (result, ret) = match plan.clone_return {
                CloneReturn::Pointer => (format!("*{name}"), "return out"),
                CloneReturn::Value => (name.clone(), "return *out"),
            };
            self.out.line(&format!(
                "// DeepCopy is an autogenerated deepcopy function, copying the receiver, \
                 creating a new {name}."
            ));
            self.out
                .open(&format!("func (in {recv}) DeepCopy() {result} {{"));
            self.out.open("if in == nil {");
            self.out.line("return nil");
            self.out.close();
            self.out.line(&format!("out := new({name})"));
            self.out.line("in.DeepCopyInto(out)");
            self.out.line(ret);
            self.out.close();
            self.out.blank();
        }

        for method in &plan.interfaces {
            let iface = self
                .imports
                .qualify(&method.interface.package, &method.interface.name);
            let recv = match method.receiver {
                InterfaceReceiver::Pointer => format!("*{name}"),
                InterfaceReceiver::Value => name.clone(),
            };
            self.out.line(&format!(
                "// {} is an autogenerated deepcopy function, copying the receiver, \
                 creating a new {iface}.",
                method.method
            ));
            self.out.open(&format!(
                "func (in {recv}) {}() {iface} {{",
                method.method
            ));
            match (method.receiver, plan.clone_return) {
                (_, CloneReturn::Value) => self.out.line("return in.DeepCopy()"),
                (InterfaceReceiver::Pointer, CloneReturn::Pointer) => {
                    self.out.open("if c := in.DeepCopy(); c != nil {");
                    self.out.line("return c");
                    self.out.close();
                    self.out.line("return nil");
                }
                (InterfaceReceiver::Value, CloneReturn::Pointer) => {
                    self.out.line("return *in.DeepCopy()");
                }
            }
            self.out.close();
            self.out.blank();
        }
    }

    /// `dst` becomes a deep copy of `src`. Both are addressable expressions
    /// of type `ty`; `dst` already holds a shallow copy or the zero value.
    fn emit_value(&mut self, ty: TypeId, strategy: &CopyStrategy, src: &str, dst: &str) {
        match strategy {
            CopyStrategy::DirectAssign => self.out.line(&format!("{dst} = {src}")),
            CopyStrategy::RecurseIntoGenerated(methods)
            | CopyStrategy::RecurseIntoPredefined(methods) => {
                if self.universe.is_reference(ty) {
                    self.out.open(&format!("if {src} != nil {{"));
                    self.emit_method_copy(*methods, true, src, dst);
                    self.out.close();
                } else {
                    self.emit_method_copy(*methods, false, src, dst);
                }
            }
            CopyStrategy::Interface(call) => {
                self.out.open(&format!("if {src} != nil {{"));
                self.out
                    .line(&format!("{dst} = {}.{}()", operand(src), call.method));
                self.out.close();
            }
            CopyStrategy::ReflectiveClone => self.emit_reflective(ty, src, dst),
            CopyStrategy::Pointer(_) | CopyStrategy::Slice(_) | CopyStrategy::Map(_) => {
                self.out.open(&format!("if {src} != nil {{"));
                self.out
                    .line(&format!("in, out := {}, {}", address(src), address(dst)));
                self.emit_slot(ty, strategy);
                self.out.close();
            }
            CopyStrategy::Array(_) => {
                self.out.open("{");
                self.out
                    .line(&format!("in, out := {}, {}", address(src), address(dst)));
                self.emit_slot(ty, strategy);
                self.out.close();
            }
        }
    }

    fn emit_method_copy(&mut self, methods: CopyMethods, reference: bool, src: &str, dst: &str) {
        let recv = receiver(src);
        let line = match methods.clone {
            Some(CloneReturn::Value) if reference || !methods.into => {
                format!("{dst} = {recv}.DeepCopy()")
            }
            Some(CloneReturn::Pointer) if !methods.into => format!("{dst} = *{recv}.DeepCopy()"),
            _ => format!("{recv}.DeepCopyInto({})", address(dst)),
        };
        self.out.line(&line);
    }

    fn emit_reflective(&mut self, ty: TypeId, src: &str, dst: &str) {
        let Some(func) = &self.config.reflective_clone else {
            return;
        };
        let call = self.imports.qualify(&func.package, &func.name);
        if ty == TypeId::EMPTY_INTERFACE {
            self.out.line(&format!("{dst} = {call}({src})"));
            return;
        }
        let spelled = self.render(ty);
        self.out
            .open(&format!("if cloned := {call}({src}); cloned != nil {{"));
        self.out.line(&format!("{dst} = cloned.({spelled})"));
        self.out.close();
    }

    /// `*out` becomes a deep copy of `*in`; both point at a `ty`, and `*in`
    /// is non-nil when `ty` is nil-able.
    fn emit_slot(&mut self, ty: TypeId, strategy: &CopyStrategy) {
        match strategy {
            CopyStrategy::Pointer(elem) => {
                let spelled = self.render(elem.ty);
                self.out.line(&format!("*out = new({spelled})"));
                self.emit_value(elem.ty, &elem.strategy, "**in", "**out");
            }
            CopyStrategy::Slice(elem) => {
                let spelled = self.render(ty);
                self.out.line(&format!("*out = make({spelled}, len(*in))"));
                if elem.strategy == CopyStrategy::DirectAssign {
                    self.out.line("copy(*out, *in)");
                } else {
                    self.out.open("for i := range *in {");
                    self.emit_value(elem.ty, &elem.strategy, "(*in)[i]", "(*out)[i]");
                    self.out.close();
                }
            }
            CopyStrategy::Array(elem) => {
                self.out.line("*out = *in");
                if elem.strategy != CopyStrategy::DirectAssign {
                    self.out.open("for i := range *in {");
                    self.emit_value(elem.ty, &elem.strategy, "(*in)[i]", "(*out)[i]");
                    self.out.close();
                }
            }
            CopyStrategy::Map(elem) => {
                let spelled = self.render(ty);
                self.out.line(&format!("*out = make({spelled}, len(*in))"));
                self.out.open("for key, val := range *in {");
                self.emit_map_value(elem);
                self.out.close();
            }
            other => self.emit_value(ty, other, "*in", "*out"),
        }
    }

    fn emit_map_value(&mut self, elem: &Element) {
        let reference = self.universe.is_reference(elem.ty);
        match &elem.strategy {
            CopyStrategy::DirectAssign => self.out.line("(*out)[key] = val"),
            CopyStrategy::RecurseIntoGenerated(methods)
            | CopyStrategy::RecurseIntoPredefined(methods)
                if !reference && methods.clone.is_some() =>
            {
                let deref = if methods.clone == Some(CloneReturn::Pointer) {
                    "*"
                } else {
                    ""
                };
                self.out
                    .line(&format!("(*out)[key] = {deref}val.DeepCopy()"));
            }
            strategy => {
                let spelled = self.render(elem.ty);
                self.out.line(&format!("var outVal {spelled}"));
                self.emit_value(elem.ty, strategy, "val", "outVal");
                self.out.line("(*out)[key] = outVal");
            }
        }
    }
}

/// Address of an addressable expression; `&*p` collapses to `p`.
fn address(expr: &str) -> String {
    match expr.strip_prefix('*') {
        Some(rest) => rest.to_string(),
        None => format!("&{expr}"),
    }
}

/// Expression to call a method on. A dereference is dropped, since Go
/// method calls take pointers and values alike.
fn receiver(expr: &str) -> String {
    match expr.strip_prefix('*') {
        Some(rest) => operand(rest),
        None => expr.to_string(),
    }
}

/// Parenthesize a dereference so a selector binds to the whole expression.
fn operand(expr: &str) -> String {
    if expr.starts_with('*') {
        format!("({expr})")
    } else {
        expr.to_string()
    }
}

//! Bridge function and stub-table emission.
//!
//! Three bridge kinds, each emitted as one C++ function per signature plus
//! one lookup table per kind:
//!
//! - `__M2N_<name>`: the interpreter calls a native function. Arguments are
//!   read from the interpreter frame at `localVarBase + argVarIndexs[i]`.
//! - `__N2M_<name>`: native code calls an interpreted method. Arguments are
//!   packed into a `StackObject` array for `Interpreter::Execute`.
//! - `__N2M_AdjustorThunk_<name>`: as `__N2M_`, but the receiver points at a
//!   boxed value type and is advanced past the object header first.
//!
//! Tables map the canonical name to the function and end with a
//! `{nullptr, nullptr}` row. Emission order is the caller's list order, so a
//! sorted input gives byte-identical output across runs.

use std::collections::BTreeSet;

use bridge_abi::{AbiStrategy, BridgeKind, BridgeSignature, ParamSlot, SortedBridges, TypeCategory};

use crate::c_types::{c_type, stack_field, type_definition};
use crate::output::{Emitter, StringEmitter};
use crate::EmitError;

/// Name prefix of the generated function for `kind`.
pub const fn function_prefix(kind: BridgeKind) -> &'static str {
    match kind {
        BridgeKind::ManagedToNative => "__M2N_",
        BridgeKind::NativeToManaged => "__N2M_",
        BridgeKind::AdjustorThunk => "__N2M_AdjustorThunk_",
    }
}

/// The C identifier of `sig`'s `kind` bridge.
pub fn function_name(kind: BridgeKind, sig: &BridgeSignature) -> String {
    format!("{}{}", function_prefix(kind), sig.canonical_name())
}

/// Element type and variable name of the stub table for `kind`.
const fn table_decl(kind: BridgeKind) -> (&'static str, &'static str) {
    match kind {
        BridgeKind::ManagedToNative => ("Managed2NativeMethodInfo", "g_managed2nativeStub"),
        BridgeKind::NativeToManaged => ("Native2ManagedMethodInfo", "g_native2managedStub"),
        BridgeKind::AdjustorThunk => ("NativeAdjustThunkMethodInfo", "g_adjustThunkStub"),
    }
}

fn arg_name(slot: &ParamSlot) -> String {
    format!("__arg{}", slot.index)
}

/// Native parameter list: each slot's C type, then the method info.
fn native_params(sig: &BridgeSignature) -> String {
    let mut params: Vec<String> = sig
        .params()
        .iter()
        .map(|slot| format!("{} {}", c_type(slot.category), arg_name(slot)))
        .collect();
    params.push("const MethodInfo* method".to_owned());
    params.join(", ")
}

/// Emits bridge code for one target.
pub struct BridgeEmitter {
    strategy: &'static dyn AbiStrategy,
}

impl BridgeEmitter {
    pub fn new(strategy: &'static dyn AbiStrategy) -> Self {
        Self { strategy }
    }

    /// Struct definitions for every aggregate type the bridges mention,
    /// each once, in name order.
    pub fn emit_type_definitions(&self, bridges: &SortedBridges, out: &mut dyn Emitter) {
        let definitions: BTreeSet<String> = BridgeKind::ALL
            .iter()
            .flat_map(|&kind| bridges.get(kind))
            .flat_map(|sig| {
                std::iter::once(sig.ret().category).chain(sig.param_categories())
            })
            .filter_map(type_definition)
            .collect();

        for definition in &definitions {
            out.emit_line(0, definition);
        }
    }

    /// Interpreter-calls-native bridge for `sig`.
    pub fn emit_managed_to_native(&self, sig: &BridgeSignature, out: &mut dyn Emitter) {
        let name = function_name(BridgeKind::ManagedToNative, sig);
        let ret = sig.ret();

        out.emit_line(
            0,
            &format!(
                "static void {name}(const MethodInfo* method, uint16_t* argVarIndexs, \
                 StackObject* localVarBase, void* ret)"
            ),
        );
        out.emit_line(0, "{");
        out.emit_line(
            1,
            &format!(
                "typedef {} (*NativeMethod)({});",
                c_type(ret.category),
                native_params(sig)
            ),
        );

        let mut args: Vec<String> = sig.params().iter().map(read_frame_arg).collect();
        args.push("method".to_owned());
        let call = format!("((NativeMethod)(method->methodPointer))({})", args.join(", "));
        if ret.is_void() {
            out.emit_line(1, &format!("{call};"));
        } else {
            out.emit_line(1, &format!("*({}*)ret = {call};", c_type(ret.category)));
        }
        out.emit_line(0, "}");
    }

    /// Native-calls-interpreter bridge for `sig`.
    pub fn emit_native_to_managed(&self, sig: &BridgeSignature, out: &mut dyn Emitter) {
        self.emit_interpreter_entry(BridgeKind::NativeToManaged, sig, None, out);
    }

    /// Adjustor thunk for `sig`, whose slot 0 must be a pointer-sized receiver.
    pub fn emit_adjustor_thunk(
        &self,
        sig: &BridgeSignature,
        out: &mut dyn Emitter,
    ) -> Result<(), EmitError> {
        match sig.params().first() {
            Some(receiver) if receiver.category == self.strategy.pointer_category() => {}
            _ => {
                return Err(EmitError::MissingReceiver {
                    name: sig.canonical_name().to_owned(),
                })
            }
        }
        let header = self.strategy.object_header_size();
        self.emit_interpreter_entry(BridgeKind::AdjustorThunk, sig, Some(header), out);
        Ok(())
    }

    /// Shared body of `__N2M_` bridges and adjustor thunks. `receiver_offset`
    /// is added to slot 0 before it is stored.
    fn emit_interpreter_entry(
        &self,
        kind: BridgeKind,
        sig: &BridgeSignature,
        receiver_offset: Option<u32>,
        out: &mut dyn Emitter,
    ) {
        let ret = sig.ret();
        out.emit_line(
            0,
            &format!(
                "static {} {}({})",
                c_type(ret.category),
                function_name(kind, sig),
                native_params(sig)
            ),
        );
        out.emit_line(0, "{");

        let params = sig.params();
        if params.is_empty() {
            out.emit_line(1, "StackObject* args = nullptr;");
        } else {
            out.emit_line(1, &format!("StackObject args[{}] = {{}};", params.len()));
        }
        for slot in params {
            let offset = receiver_offset.filter(|_| slot.index == 0);
            out.emit_line(1, &pack_interpreter_arg(slot, offset));
        }

        if ret.is_void() {
            out.emit_line(1, "Interpreter::Execute(method, args, nullptr);");
        } else {
            out.emit_line(1, &format!("StackObject ret[{}];", ret.slot_count));
            out.emit_line(1, "Interpreter::Execute(method, args, ret);");
            out.emit_line(1, &format!("return *({}*)ret;", c_type(ret.category)));
        }
        out.emit_line(0, "}");
    }

    /// Stub table for `kind` over `sigs`, in the given order.
    pub fn emit_table(&self, kind: BridgeKind, sigs: &[BridgeSignature], out: &mut dyn Emitter) {
        let (element, variable) = table_decl(kind);
        let cast = match kind {
            BridgeKind::ManagedToNative => "",
            BridgeKind::NativeToManaged | BridgeKind::AdjustorThunk => "(Il2CppMethodPointer)",
        };

        out.emit_line(0, &format!("{element} {variable}[] ="));
        out.emit_line(0, "{");
        for sig in sigs {
            out.emit_line(
                1,
                &format!(
                    "{{\"{}\", {cast}{}}},",
                    sig.canonical_name(),
                    function_name(kind, sig)
                ),
            );
        }
        out.emit_line(1, "{nullptr, nullptr},");
        out.emit_line(0, "};");
    }

    /// All functions of one kind followed by their table.
    pub fn emit_section(
        &self,
        kind: BridgeKind,
        sigs: &[BridgeSignature],
        out: &mut dyn Emitter,
    ) -> Result<(), EmitError> {
        out.emit_line(0, &format!("// {kind} bridges"));
        out.emit_newline();
        for sig in sigs {
            match kind {
                BridgeKind::ManagedToNative => self.emit_managed_to_native(sig, out),
                BridgeKind::NativeToManaged => self.emit_native_to_managed(sig, out),
                BridgeKind::AdjustorThunk => self.emit_adjustor_thunk(sig, out)?,
            }
            out.emit_newline();
        }
        self.emit_table(kind, sigs, out);
        tracing::debug!(%kind, count = sigs.len(), "emitted bridge section");
        Ok(())
    }

    /// The complete generated block: type definitions, then the
    /// managed-to-native, native-to-managed and adjustor sections.
    pub fn emit_all(&self, bridges: &SortedBridges) -> Result<String, EmitError> {
        let mut out = StringEmitter::with_capacity(
            256 * BridgeKind::ALL
                .iter()
                .map(|&kind| bridges.get(kind).len() + 1)
                .sum::<usize>(),
        );

        self.emit_type_definitions(bridges, &mut out);
        if !out.is_empty() {
            out.emit_newline();
        }
        for kind in BridgeKind::ALL {
            self.emit_section(kind, bridges.get(kind), &mut out)?;
            out.emit_newline();
        }

        out.ensure_trailing_newline();
        Ok(out.output())
    }
}

/// Expression reading slot `slot` from the interpreter frame.
fn read_frame_arg(slot: &ParamSlot) -> String {
    let addr = format!("(localVarBase + argVarIndexs[{}])", slot.index);
    if slot.category == TypeCategory::ByRef {
        return format!("(void*){addr}");
    }
    match stack_field(slot.category) {
        Some(field) if !slot.native_by_address => format!("{addr}->{field}"),
        _ => format!("*({}*){addr}", c_type(slot.category)),
    }
}

/// Statement storing native argument `slot` into `args`.
fn pack_interpreter_arg(slot: &ParamSlot, receiver_offset: Option<u32>) -> String {
    let arg = arg_name(slot);
    let i = slot.index;
    if slot.category == TypeCategory::ByRef {
        return format!("args[{i}].ptr = {arg};");
    }
    if slot.interp_by_address {
        return format!("args[{i}].ptr = &{arg};");
    }
    let value = match receiver_offset {
        Some(offset) => format!("{arg} + {offset}"),
        None => arg,
    };
    format!("*({}*)(args + {i}) = {value};", c_type(slot.category))
}

//! Reference extraction from a single compiled class.
//!
//! One linear pass over every method's Code attribute, flat-matching the
//! instruction categories that carry type operands: method invocations,
//! field accesses, and instantiation/type-check/cast/array-creation. Raw
//! constant-pool names are normalized before they reach the caller, and the
//! class's own name, primitive tokens, and runtime classes are dropped.

use anyhow::{Result, anyhow};
use krakatau2::lib::{
    ParserOptions,
    classfile::{self, attrs::AttrBody, code::Instr, cpool::Const},
};
use std::collections::HashSet;

use crate::runtime;

const PARSER_OPTIONS: ParserOptions = ParserOptions {
    no_short_code_attr: true,
};

/// Normalizes a raw constant-pool type name into its dotted graph key.
///
/// Every leading `[` (array dimension) is stripped; an `L...;` descriptor
/// wrapper is unwrapped only when both the prefix and the suffix are present,
/// so a class genuinely named `List` survives; internal slashes become dots.
pub fn normalize_type_name(raw: &str) -> String {
    let mut name = raw.trim_start_matches('[');
    if let Some(inner) = name.strip_prefix('L').and_then(|rest| rest.strip_suffix(';')) {
        name = inner;
    }
    name.replace('/', ".")
}

/// Parses `class_bytes` and returns the set of normalized non-runtime type
/// names its method bodies reference. Malformed bytes are a hard error.
pub fn extract_references(class_bytes: &[u8]) -> Result<HashSet<String>> {
    let class = classfile::parse(class_bytes, PARSER_OPTIONS)
        .map_err(|err| anyhow!("malformed class file: {:?}", err))?;

    let cp = &class.cp.0;
    let own_name = const_class_name(cp, class.this).map(|name| normalize_type_name(&name));

    let mut references = HashSet::new();
    let mut record = |raw: &str| {
        let name = normalize_type_name(raw);
        if runtime::is_runtime_type(&name) {
            return;
        }
        if own_name.as_deref() == Some(name.as_str()) {
            return;
        }
        references.insert(name);
    };

    for method in &class.methods {
        for attr in &method.attrs {
            let AttrBody::Code((code, _)) = &attr.body else {
                continue;
            };
            for (_, instruction) in &code.bytecode.0 {
                match instruction {
                    Instr::Invokevirtual(idx)
                    | Instr::Invokespecial(idx)
                    | Instr::Invokestatic(idx) => {
                        if let Some(owner) = member_owner(cp, *idx) {
                            record(&owner);
                        }
                    }
                    Instr::Invokeinterface(idx, ..) => {
                        if let Some(owner) = member_owner(cp, *idx) {
                            record(&owner);
                        }
                    }
                    Instr::New(idx)
                    | Instr::Checkcast(idx)
                    | Instr::Instanceof(idx)
                    | Instr::Anewarray(idx) => {
                        if let Some(operand) = const_class_name(cp, *idx) {
                            record(&operand);
                        }
                    }
                    Instr::Multianewarray(idx, ..) => {
                        if let Some(operand) = const_class_name(cp, *idx) {
                            record(&operand);
                        }
                    }
                    Instr::Getstatic(idx)
                    | Instr::Putstatic(idx)
                    | Instr::Getfield(idx)
                    | Instr::Putfield(idx) => {
                        if let Some((owner, descriptor)) = field_owner_and_type(cp, *idx) {
                            record(&owner);
                            record(&descriptor);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(references)
}

fn const_utf8(cp: &[Const<'_>], idx: u16) -> Option<String> {
    match cp.get(idx as usize)? {
        Const::Utf8(raw) => Some(String::from_utf8_lossy(raw.0).into_owned()),
        _ => None,
    }
}

fn const_class_name(cp: &[Const<'_>], idx: u16) -> Option<String> {
    match cp.get(idx as usize)? {
        Const::Class(name_idx) => const_utf8(cp, *name_idx),
        _ => None,
    }
}

fn member_owner(cp: &[Const<'_>], idx: u16) -> Option<String> {
    match cp.get(idx as usize)? {
        Const::Method(class_idx, _) | Const::InterfaceMethod(class_idx, _) => {
            const_class_name(cp, *class_idx)
        }
        _ => None,
    }
}

fn field_owner_and_type(cp: &[Const<'_>], idx: u16) -> Option<(String, String)> {
    let Const::Field(class_idx, nat_idx) = cp.get(idx as usize)? else {
        return None;
    };
    let owner = const_class_name(cp, *class_idx)?;
    let Const::NameAndType(_, desc_idx) = cp.get(*nat_idx as usize)? else {
        return None;
    };
    let descriptor = const_utf8(cp, *desc_idx)?;
    Some((owner, descriptor))
}

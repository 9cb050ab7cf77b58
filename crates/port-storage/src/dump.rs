//! Human-readable data storage dump for debugging and tests.

use std::fmt::Write as _;

use crate::ids::StringId;
use crate::storage::DataStorage;

/// Digits needed to print indices below `count`.
fn width_for_count(count: usize) -> usize {
    if count <= 1 {
        1
    } else {
        (count - 1).ilog10() as usize + 1
    }
}

struct DumpContext {
    str_width: usize,
    section_width: usize,
}

impl DumpContext {
    fn name(&self, name: Option<StringId>) -> String {
        match name {
            Some(id) => format!("S{:0w$}", id.0, w = self.str_width),
            None => "-".to_string(),
        }
    }
}

/// Generate a human-readable dump of the storage.
pub fn dump(storage: &DataStorage) -> String {
    let mut out = String::new();
    let ctx = DumpContext {
        str_width: width_for_count(storage.strings.len()),
        section_width: width_for_count(storage.sections.len()),
    };

    dump_strings(&mut out, storage, &ctx);
    dump_sections(&mut out, storage, &ctx);
    dump_symbols(&mut out, storage, &ctx);
    dump_properties(&mut out, storage, &ctx);

    out
}

fn dump_strings(out: &mut String, storage: &DataStorage, ctx: &DumpContext) {
    let w = ctx.str_width;

    writeln!(out, "[strings]").unwrap();
    for (i, s) in storage.strings.iter().enumerate() {
        let s = String::from_utf8_lossy(s.as_bytes());
        writeln!(out, "S{i:0w$} {s:?}").unwrap();
    }
    out.push('\n');
}

fn dump_sections(out: &mut String, storage: &DataStorage, ctx: &DumpContext) {
    let w = ctx.section_width;

    writeln!(out, "[sections]").unwrap();
    for (i, section) in storage.sections.iter().enumerate() {
        let name = ctx.name(section.name);
        let size = section.content.len();
        writeln!(out, "C{i:0w$} {name} ({size} bytes)").unwrap();
        dump_bytes(out, &section.content);
    }
    out.push('\n');
}

fn dump_symbols(out: &mut String, storage: &DataStorage, ctx: &DumpContext) {
    let w = width_for_count(storage.symbols.len());
    let cw = ctx.section_width;

    writeln!(out, "[symbols]").unwrap();
    for (i, symbol) in storage.symbols.iter().enumerate() {
        let name = ctx.name(symbol.name);
        let section = symbol.section.0;
        let value = symbol.value;
        let at_end = storage
            .section(symbol.section)
            .is_some_and(|s| value as usize == s.content.len());
        let suffix = if at_end { "  ; end" } else { "" };
        writeln!(out, "Y{i:0w$} {name} = C{section:0cw$}+{value}{suffix}").unwrap();
    }
    out.push('\n');
}

fn dump_properties(out: &mut String, storage: &DataStorage, ctx: &DumpContext) {
    let w = width_for_count(storage.properties.len());

    writeln!(out, "[properties]").unwrap();
    for (i, property) in storage.properties.iter().enumerate() {
        let name = ctx.name(property.name);
        let size = property.value.len();
        writeln!(out, "P{i:0w$} {name} ({size} bytes)").unwrap();
        dump_bytes(out, &property.value);
    }
}

/// Hex rows of 16 bytes with an ASCII column.
fn dump_bytes(out: &mut String, bytes: &[u8]) {
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let hex = chunk
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ");
        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        writeln!(out, "  {:04x}  {hex:<47}  {ascii}", row * 16).unwrap();
    }
}

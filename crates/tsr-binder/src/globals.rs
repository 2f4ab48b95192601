//! Ambient globals every program can reference without declaring them.
//!
//! There is no lib.d.ts here: these names resolve to `BUILTIN` symbols with
//! no declarations, so their types are open.

use tsr_core::SymbolFlags;

const VALUE_AND_TYPE: &[&str] = &[
    "AbortController",
    "Array",
    "ArrayBuffer",
    "BigInt",
    "BigInt64Array",
    "BigUint64Array",
    "Boolean",
    "Buffer",
    "DataView",
    "Date",
    "Element",
    "Error",
    "EvalError",
    "Event",
    "Float32Array",
    "Float64Array",
    "Function",
    "HTMLElement",
    "Int16Array",
    "Int32Array",
    "Int8Array",
    "Map",
    "Number",
    "Object",
    "Promise",
    "Proxy",
    "RangeError",
    "ReferenceError",
    "RegExp",
    "Request",
    "Response",
    "Set",
    "SharedArrayBuffer",
    "String",
    "Symbol",
    "SyntaxError",
    "TextDecoder",
    "TextEncoder",
    "TypeError",
    "Uint16Array",
    "Uint32Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "URIError",
    "URL",
    "WeakMap",
    "WeakRef",
    "WeakSet",
];

const VALUES: &[&str] = &[
    "Atomics",
    "clearInterval",
    "clearTimeout",
    "console",
    "decodeURI",
    "decodeURIComponent",
    "__dirname",
    "document",
    "encodeURI",
    "encodeURIComponent",
    "exports",
    "fetch",
    "__filename",
    "globalThis",
    "Infinity",
    "Intl",
    "isFinite",
    "isNaN",
    "JSON",
    "Math",
    "module",
    "NaN",
    "parseFloat",
    "parseInt",
    "process",
    "queueMicrotask",
    "Reflect",
    "require",
    "setInterval",
    "setTimeout",
    "structuredClone",
    "undefined",
    "window",
];

const TYPES: &[&str] = &[
    "ArrayLike",
    "AsyncGenerator",
    "AsyncIterable",
    "AsyncIterator",
    "Awaited",
    "Capitalize",
    "ConstructorParameters",
    "Exclude",
    "Extract",
    "Generator",
    "InstanceType",
    "Iterable",
    "IterableIterator",
    "Iterator",
    "Lowercase",
    "NonNullable",
    "Omit",
    "Parameters",
    "Partial",
    "Pick",
    "PromiseLike",
    "PropertyKey",
    "Readonly",
    "ReadonlyArray",
    "ReadonlyMap",
    "ReadonlySet",
    "Record",
    "Required",
    "ReturnType",
    "TemplateStringsArray",
    "ThisType",
    "Uncapitalize",
    "Uppercase",
];

/// Every builtin global with the meanings it carries.
pub fn builtin_globals() -> impl Iterator<Item = (&'static str, SymbolFlags)> {
    let value = SymbolFlags::BUILTIN | SymbolFlags::FUNCTION_SCOPED_VARIABLE;
    let both = value | SymbolFlags::INTERFACE;
    let ty = SymbolFlags::BUILTIN | SymbolFlags::INTERFACE;
    VALUE_AND_TYPE
        .iter()
        .map(move |&name| (name, both))
        .chain(VALUES.iter().map(move |&name| (name, value)))
        .chain(TYPES.iter().map(move |&name| (name, ty)))
}

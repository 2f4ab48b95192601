//! Tests for the two tree passes over a syntax-only model.

use crate::context::MutationContext;
use crate::mutate::mutate_unit;
use crate::normalize::normalize_unit;
use crate::scanner::{DeclarationRecord, Scanner};
use crate::test_support::{NameModel, strict_options};
use tsr_common::TransformOptions;
use tsr_emitter::{PrintOptions, print_to_string};

fn normalize_source(source: &str) -> String {
    let model = NameModel::parse(source);
    let options = strict_options();
    let mut scanner = Scanner::new(&model);
    let mut ctx = MutationContext::new(&mut scanner, &options, model.unit_id(), None);
    normalize_unit(&mut ctx).expect("normalize");
    let (arena, root, _) = ctx.finish();
    print_to_string(&arena, root, PrintOptions::default())
}

fn mutate_source_with(
    source: &str,
    options: &TransformOptions,
) -> (String, Vec<DeclarationRecord>) {
    let model = NameModel::parse(source);
    let mut scanner = Scanner::new(&model);
    let mut ctx = MutationContext::new(&mut scanner, options, model.unit_id(), None);
    mutate_unit(&mut ctx).expect("mutate");
    let (arena, root, _) = ctx.finish();
    let text = print_to_string(&arena, root, PrintOptions::default());
    (text, scanner.collect_declarations())
}

fn mutate_source(source: &str) -> String {
    let mut options = strict_options();
    options.annotate = false;
    mutate_source_with(source, &options).0
}

// =============================================================================
// Pass 1
// =============================================================================

#[test]
fn test_normalize_fills_placeholder_annotations() {
    let output = normalize_source("let x = 1;\nfunction f(a) {\n    return a;\n}\n");
    assert!(output.contains("let x: any = 1;"), "{output}");
    assert!(output.contains("function f(a: any): any {"), "{output}");
}

#[test]
fn test_normalize_keeps_existing_annotations() {
    let output = normalize_source("let x: number = 1;\n");
    assert_eq!(output, "let x: number = 1;\n");
}

#[test]
fn test_normalize_skips_loop_and_catch_bindings() {
    let output = normalize_source("for (const v of vs) { }\ntry {\n    f();\n} catch (e) {\n    g(e);\n}\n");
    assert!(output.contains("for (const v of vs)"), "{output}");
    assert!(output.contains("catch (e)"), "{output}");
    assert!(!output.contains("v: any"), "{output}");
    assert!(!output.contains("e: any"), "{output}");
}

#[test]
fn test_normalize_rewrites_casts() {
    let output = normalize_source("const n = v as number;\nconst c = [1] as const;\n");
    assert!(output.contains("t.number().assert(v)"), "{output}");
    assert!(output.contains("as const"), "{output}");
    assert!(output.starts_with("const n: any"), "{output}");
}

#[test]
fn test_normalize_rewrites_nested_casts_inside_out() {
    let output = normalize_source("const n = (v as string) as number;\n");
    assert!(
        output.contains("t.number().assert((t.string().assert(v)))")
            || output.contains("t.number().assert(t.string().assert(v))"),
        "{output}"
    );
}

// =============================================================================
// Pass 2
// =============================================================================

#[test]
fn test_let_declaration_and_assignment_are_checked_once() {
    let output = mutate_source("let x: number = 1;\nx = 2;\n");
    assert!(output.starts_with("import t from \"ts-runtime/lib\";\n"), "{output}");
    assert!(
        output.contains("let _xType = t.number(), x: number = _xType.assert(1);"),
        "{output}"
    );
    assert!(output.contains("x = _xType.assert(2);"), "{output}");
    assert_eq!(output.matches(".assert(").count(), 2, "{output}");
}

#[test]
fn test_const_declaration_asserts_inline() {
    let output = mutate_source("const c: string = \"a\";\n");
    assert!(output.contains("const c: string = t.string().assert(\"a\");"), "{output}");
}

#[test]
fn test_open_and_unannotated_targets_are_left_alone() {
    let source = "let a: any = 1;\na = 2;\nlet b = 3;\nb = 4;\n";
    let output = mutate_source(source);
    assert_eq!(output, source);
}

#[test]
fn test_destructured_targets_are_not_checked() {
    let output = mutate_source("let [a, b]: number[] = pair;\na = 2;\n");
    assert!(output.contains("\na = 2;"), "{output}");
    assert!(!output.contains("_aType"), "{output}");
    assert!(!output.contains(".assert("), "{output}");
}

#[test]
fn test_compound_assignment_is_checked() {
    let output = mutate_source("let n: number = 0;\nn += 2;\n");
    assert!(output.contains("n += _nType.assert(2);"), "{output}");
}

#[test]
fn test_comparison_is_not_an_assignment() {
    let output = mutate_source("let n: number = 0;\nif (n === 2) { }\n");
    assert!(output.contains("n === 2"), "{output}");
    assert_eq!(output.matches(".assert(").count(), 1, "{output}");
}

#[test]
fn test_lib_binding_avoids_existing_identifier() {
    let output = mutate_source("let t = 1;\nconst x: number = t;\n");
    assert!(output.starts_with("import _t from \"ts-runtime/lib\";"), "{output}");
    assert!(output.contains("_t.number().assert(t)"), "{output}");
}

#[test]
fn test_interface_declarations_merge_into_one_binding() {
    let (output, declarations) = mutate_source_with(
        "interface A { a: number; }\ninterface A { b: string; }\n",
        &strict_options(),
    );
    assert_eq!(output.matches("const A = ").count(), 1, "{output}");
    assert!(output.contains("t.type(\"A\", t.object("), "{output}");
    assert!(output.contains("t.property(\"a\", t.number())"), "{output}");
    assert!(output.contains("t.property(\"b\", t.string())"), "{output}");
    assert!(!output.contains("interface"), "{output}");
    assert_eq!(declarations.len(), 1);
    assert_eq!(declarations[0].name, "A");
    assert_eq!(declarations[0].lib_name, "t");
}

#[test]
fn test_merge_is_deterministic() {
    let source = "interface A { a: number; }\ninterface B extends A { b: string; }\ninterface A { c: boolean; }\n";
    let first = mutate_source(source);
    let second = mutate_source(source);
    assert_eq!(first, second);
}

#[test]
fn test_exported_interface_stays_exported() {
    let output = mutate_source("export interface P { x: number; }\n");
    assert!(output.contains("export const P = t.type(\"P\""), "{output}");
}

#[test]
fn test_self_referencing_interface_is_deferred() {
    let output = mutate_source("interface L { next: L; }\n");
    assert!(output.contains("t.type(\"L\", (L) => t.object("), "{output}");
    assert!(output.contains("t.property(\"next\", L)"), "{output}");
}

#[test]
fn test_deferred_interface_wraps_the_whole_intersection() {
    let output = mutate_source("interface A { a: number; }\ninterface C extends A { next: C; }\n");
    assert!(
        output.contains("const C = t.type(\"C\", (C) => t.intersect(A, t.object("),
        "{output}"
    );
    assert!(output.contains("t.property(\"next\", C)"), "{output}");
}

#[test]
fn test_empty_interface_becomes_empty_object() {
    let output = mutate_source("interface E {}\n");
    assert!(output.contains("const E = t.type(\"E\", t.object());"), "{output}");
}

#[test]
fn test_type_alias_becomes_binding() {
    let output = mutate_source("type Id = string | number;\n");
    assert!(
        output.contains("const Id = t.type(\"Id\", t.union(t.string(), t.number()));"),
        "{output}"
    );
}

#[test]
fn test_function_prologue_and_return_check() {
    let output = mutate_source("function f(a: number): string {\n    return \"x\";\n}\n");
    assert!(output.contains("let _aType = t.number();"), "{output}");
    assert!(output.contains("const _returnType = t.return(t.string());"), "{output}");
    assert!(output.contains("t.param(\"a\", _aType).assert(a);"), "{output}");
    assert!(output.contains("return _returnType.assert(\"x\");"), "{output}");
    let declaration = output.find("let _aType").unwrap_or(usize::MAX);
    let check = output.find("t.param(").unwrap_or(0);
    assert!(declaration < check, "{output}");
}

#[test]
fn test_optional_and_rest_parameters() {
    let output = mutate_source("function f(a?: number, ...r: string[]) { }\n");
    assert!(output.contains("t.param(\"a\", _aType, true).assert(a);"), "{output}");
    assert!(output.contains("t.rest(\"r\", _rType).assert(r);"), "{output}");
}

#[test]
fn test_concise_arrow_body_becomes_block() {
    let output = mutate_source("const f = (a: number): number => a;\n");
    assert!(output.contains("return _returnType.assert(a);"), "{output}");
    assert!(output.contains("t.param(\"a\", _aType).assert(a);"), "{output}");
}

#[test]
fn test_async_functions_do_not_check_returns() {
    let output = mutate_source("async function f(): Promise<number> {\n    return 1;\n}\n");
    assert!(!output.contains("_returnType"), "{output}");
}

#[test]
fn test_annotate_function_declaration() {
    let (output, _) = mutate_source_with("function f(a: number): void { }\n", &strict_options());
    assert!(
        output.contains("t.annotate(f, t.function(t.param(\"a\", t.number()), t.return(t.void())));"),
        "{output}"
    );
}

#[test]
fn test_annotate_class() {
    let (output, _) = mutate_source_with("class C {\n    x: number;\n}\n", &strict_options());
    assert!(
        output.contains("t.annotate(C, t.class(\"C\", t.object(t.property(\"x\", t.number()))));"),
        "{output}"
    );
}

#[test]
fn test_without_strict_null_checks_annotations_are_nullable() {
    let mut options = strict_options();
    options.annotate = false;
    options.compiler_options.strict_null_checks = Some(false);
    let (output, _) = mutate_source_with("const c: string = s;\n", &options);
    assert!(output.contains("t.nullable(t.string()).assert(s)"), "{output}");
}

#[test]
fn test_units_without_checks_get_no_import() {
    let source = "let a = 1;\n";
    assert_eq!(mutate_source(source), source);
}

#[test]
fn test_second_mutation_run_changes_nothing() {
    let source = "function f(a: number): number {\n    return a;\n}\nlet x: number = 1;\nx = 2;\ninterface I { n: number; }\nclass C {\n    m(s: string): void { }\n}\nconst g = (b: string): string => b;\n";
    let model = NameModel::parse(source);
    let options = strict_options();
    let mut scanner = Scanner::new(&model);
    let mut ctx = MutationContext::new(&mut scanner, &options, model.unit_id(), None);

    mutate_unit(&mut ctx).expect("first run");
    let once = print_to_string(ctx.arena(), ctx.root(), PrintOptions::default());
    mutate_unit(&mut ctx).expect("second run");
    let (arena, root, _) = ctx.finish();
    let twice = print_to_string(&arena, root, PrintOptions::default());

    assert_eq!(once, twice);
    assert_eq!(once.matches("import t from").count(), 1, "{once}");
    assert_eq!(once.matches("let _aType = t.number();").count(), 1, "{once}");
    assert_eq!(once.matches("t.annotate(f, ").count(), 1, "{once}");
    assert_eq!(once.matches("t.annotate(C, ").count(), 1, "{once}");
}

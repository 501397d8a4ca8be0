//! End-to-end lowering tests
//!
//! Run with: cargo test -p siglow-lower --test lowering_test

use siglow_lower::{
    render_program, DiagnosticKind, LoweredProgram, LoweringConfig, LoweringPass, MethodSpec,
    OverloadBody, ParameterSpec, ProgramSpec, RenderOptions, ReturnType, TypeSpec,
};
use siglow_types::{Literal, PrimitiveType, TargetTypeDecision, TargetValueType};

const MAIN_FIXTURE: &str = include_str!("fixtures/main.json");

fn lower(program: &ProgramSpec) -> LoweredProgram {
    LoweringPass::new(LoweringConfig::default()).run(program)
}

fn single_type(ty: TypeSpec) -> LoweredProgram {
    lower(&ProgramSpec::new("app").with_type(ty))
}

// ============================================================================
// Fixture
// ============================================================================

#[test]
fn test_main_fixture_renders() {
    let program = ProgramSpec::from_json(MAIN_FIXTURE).unwrap();
    let lowered = lower(&program);
    assert!(lowered.diagnostics.is_empty(), "{:?}", lowered.diagnostics);

    let expected = "\
namespace haxe.root {
\tclass Main {
\t\tint localVar;

\t\tint? localNullVar;

\t\tstatic int numTests;

\t\tstatic int numFailures;

\t\tstatic bool trueValue;

\t\tstatic bool falseValue;

\t\tstatic int staticVar;

\t\tstatic int? staticNullVar;

\t\tpublic Main() {

\t\t}

\t\tpublic void foo(int optInt, String reqString) {

\t\t}

\t\tpublic void foo(String reqString) {
\t\t\tfoo(4, reqString);
\t\t}

\t\tpublic bool foo2(int optInt, String reqString, bool optBool = false) {
\t\t\treturn false;
\t\t}

\t\tpublic bool foo2(int optInt, String reqString) {
\t\t\treturn foo2(optInt, reqString, false);
\t\t}

\t\tpublic bool foo2(String reqString, bool optBool = false) {
\t\t\treturn foo2(4, reqString, optBool);
\t\t}

\t\tpublic bool foo2(String reqString) {
\t\t\treturn foo2(reqString, false);
\t\t}

\t\tpublic void foo3(int? nullableInt) {

\t\t}

\t\tpublic void foo4(int? optInt = null) {

\t\t}

\t\tpublic void foo4() {
\t\t\tfoo4(null);
\t\t}

\t\tpublic void foo5(int? nullableIntWithDef = 4) {

\t\t}

\t\tpublic void foo5() {
\t\t\tfoo5(4);
\t\t}

\t\tpublic void foo6(int? optIntWithDef = 4) {

\t\t}

\t\tpublic void foo6() {
\t\t\tfoo6(4);
\t\t}

\t\tpublic static void main() {
\t\t\tSystem.Console.WriteLine(\"Main.main()\");
\t\t\tMain.trueValue = true;
\t\t\tMain.falseValue = false;
\t\t}
\t}
}
";
    assert_eq!(render_program(&lowered, &RenderOptions::default()), expected);
}

#[test]
fn test_manual_overload_keeps_its_own_literals() {
    let program = ProgramSpec::from_json(MAIN_FIXTURE).unwrap();
    let lowered = lower(&program);
    let main = &lowered.types[0];

    // Second foo2 declaration: its canonical body is the declaration's own call
    let manual = main.methods.iter().filter(|m| m.name == "foo2").nth(1).unwrap();
    let canonical = manual.canonical().unwrap();
    assert_eq!(canonical.signature(), "foo2(String, bool)");
    let OverloadBody::Original(siglow_lower::MethodBody::Forward(call)) = &canonical.body else {
        panic!("expected the declared forwarding body");
    };
    assert_eq!(call.render_args(), "4, reqString, optBool");
}

#[test]
fn test_fixture_stats() {
    let lowered = lower(&ProgramSpec::from_json(MAIN_FIXTURE).unwrap());
    let stats = lowered.stats;
    assert_eq!(stats.types, 1);
    assert_eq!(stats.fields, 8);
    assert_eq!(stats.methods, 10);
    assert_eq!(stats.overloads, 15);
    assert_eq!(stats.forwarding, 5);
    assert_eq!(stats.skipped_methods, 0);
}

// ============================================================================
// Overload synthesis
// ============================================================================

#[test]
fn test_k_trailing_defaults_give_k_plus_one_overloads() {
    for k in 0..4usize {
        let mut method = MethodSpec::new("f")
            .param(ParameterSpec::reference("s", "String"))
            .body_lines(["work();"]);
        for i in 0..k {
            method = method.param(ParameterSpec::value(format!("d{}", i), "Int").with_default(Literal::Int(i as i64)));
        }

        let lowered = single_type(TypeSpec::new("T").method(method));
        let overloads = &lowered.types[0].methods[0].overloads;
        assert_eq!(overloads.len(), k + 1);

        let canonical = &overloads[0];
        assert_eq!(canonical.arity(), k + 1);
        assert!(canonical.is_canonical());

        let arities: Vec<usize> = overloads.iter().map(|o| o.arity()).collect();
        let descending: Vec<usize> = (1..=k + 1).rev().collect();
        assert_eq!(arities, descending);

        for forwarding in &overloads[1..] {
            let call = forwarding.forwarding_call().unwrap();
            assert_eq!(forwarding.arity() + call.literal_count(), canonical.arity());
            assert_eq!(call.args.len(), canonical.arity());
        }
    }
}

#[test]
fn test_nullable_with_default_stays_wrapped() {
    let lowered = single_type(
        TypeSpec::new("T").method(
            MethodSpec::new("f").param(ParameterSpec::value("x", "Int").nullable().with_default(Literal::Int(4))),
        ),
    );
    let overloads = &lowered.types[0].methods[0].overloads;
    let wrapped = TargetTypeDecision::WrappedNullable(TargetValueType::Primitive(PrimitiveType::Int));
    assert_eq!(overloads[0].params[0].ty, siglow_lower::LoweredTy::Value(wrapped));
    assert_eq!(overloads[1].forwarding_call().unwrap().render_args(), "4");
}

#[test]
fn test_constructor_forwarding() {
    let lowered = single_type(
        TypeSpec::new("Point").method(
            MethodSpec::constructor("Point")
                .param(ParameterSpec::value("x", "Int"))
                .param(ParameterSpec::value("y", "Int").with_default(Literal::Int(0))),
        ),
    );
    let text = render_program(&lowered, &RenderOptions::default());
    assert!(text.contains("\t\tpublic Point(int x) : this(x, 0) {\n\n\t\t}\n"));
}

#[test]
fn test_forwarding_call_pinned_against_equal_arity_sibling() {
    let ty = TypeSpec::new("Main")
        .method(MethodSpec::new("f").param(ParameterSpec::value("a", "Int").nullable().with_default(Literal::Int(4))))
        .method(MethodSpec::new("f").param(ParameterSpec::value("b", "Int")))
        .method(MethodSpec::new("g").param(ParameterSpec::value("a", "Int").nullable().with_default(Literal::Null)))
        .method(MethodSpec::new("g").param(ParameterSpec::reference("s", "String")))
        .method(MethodSpec::new("h").param(ParameterSpec::value("a", "Long").with_default(Literal::Int(-1))))
        .method(MethodSpec::new("h").param(ParameterSpec::value("b", "Int")));

    let lowered = single_type(ty);
    assert!(lowered.diagnostics.is_empty(), "{:?}", lowered.diagnostics);

    let text = render_program(&lowered, &RenderOptions::default());
    assert!(text.contains("\t\tpublic void f() {\n\t\t\tf((int?)4);\n\t\t}\n"), "{}", text);
    assert!(text.contains("\t\tpublic void g() {\n\t\t\tg((int?)null);\n\t\t}\n"), "{}", text);
    assert!(text.contains("\t\tpublic void h() {\n\t\t\th((long)(-1));\n\t\t}\n"), "{}", text);
}

#[test]
fn test_constructor_chaining_pinned_against_sibling() {
    let ty = TypeSpec::new("Point")
        .method(
            MethodSpec::constructor("Point")
                .param(ParameterSpec::value("x", "Int"))
                .param(ParameterSpec::value("y", "Int").nullable().with_default(Literal::Null)),
        )
        .method(
            MethodSpec::constructor("Point")
                .param(ParameterSpec::value("x", "Int"))
                .param(ParameterSpec::reference("label", "String")),
        );

    let text = render_program(&single_type(ty), &RenderOptions::default());
    assert!(text.contains("\t\tpublic Point(int x) : this(x, (int?)null) {\n"), "{}", text);
}

// ============================================================================
// Collisions
// ============================================================================

#[test]
fn test_collision_raises_once_and_emits_neither() {
    // foo(int, String = "") forwards to foo(int); a separate foo(int) collides
    let ty = TypeSpec::new("Main")
        .method(
            MethodSpec::new("foo")
                .param(ParameterSpec::value("optInt", "Int"))
                .param(ParameterSpec::reference("reqString", "String").with_default(Literal::Str(String::new()))),
        )
        .method(MethodSpec::new("foo").param(ParameterSpec::value("optInt", "Int")))
        .method(MethodSpec::new("other"));

    let lowered = single_type(ty);
    let collisions: Vec<_> = lowered
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::SignatureCollision)
        .collect();
    assert_eq!(collisions.len(), 1);
    assert_eq!(collisions[0].owner, "Main");
    assert_eq!(collisions[0].member, "foo");
    assert!(collisions[0].detail.contains("(int)"));

    let main = &lowered.types[0];
    assert_eq!(main.overloads_named("foo").count(), 0);
    assert_eq!(main.overloads_named("other").count(), 1);
    assert_eq!(lowered.stats.skipped_methods, 2);
    assert!(lowered.has_errors());
}

#[test]
fn test_equal_arity_nullable_and_bare_defaults_collide() {
    // Canonicals differ (int? vs int) but both forward from f()
    let ty = TypeSpec::new("Main")
        .method(MethodSpec::new("f").param(ParameterSpec::value("a", "Int").nullable().with_default(Literal::Int(4))))
        .method(MethodSpec::new("f").param(ParameterSpec::value("b", "Int").with_default(Literal::Int(4))));

    let lowered = single_type(ty);
    assert_eq!(lowered.stats.collisions, 1);
    assert_eq!(lowered.types[0].methods.len(), 0);
}

#[test]
fn test_collision_is_per_owning_type() {
    let method = || MethodSpec::new("f").param(ParameterSpec::value("a", "Int"));
    let program = ProgramSpec::new("app")
        .with_type(TypeSpec::new("A").method(method()))
        .with_type(TypeSpec::new("B").method(method()));

    let lowered = lower(&program);
    assert!(lowered.diagnostics.is_empty());
    assert_eq!(lowered.stats.overloads, 2);
}

// ============================================================================
// Recovery
// ============================================================================

#[test]
fn test_unsupported_type_emits_placeholder() {
    let ty = TypeSpec::new("Body").method(
        MethodSpec::new("push")
            .param(ParameterSpec::value("force", "Vec3"))
            .returns(ReturnType::value("Int"))
            .body_lines(["return 0;"]),
    );

    let lowered = single_type(ty);
    assert_eq!(lowered.diagnostics.len(), 1);
    assert_eq!(lowered.diagnostics[0].kind, DiagnosticKind::UnsupportedType);
    assert_eq!(lowered.stats.unsupported, 1);

    let text = render_program(&lowered, &RenderOptions::default());
    assert!(text.contains("public int push(__Unresolved<Vec3> force) {"));
}

#[test]
fn test_registered_value_type_is_mapped() {
    let config = LoweringConfig::from_toml_str("[types]\nvalue-types = [\"Vec3\"]\n").unwrap();
    let ty = TypeSpec::new("Body")
        .method(MethodSpec::new("push").param(ParameterSpec::value("force", "Vec3").nullable()));

    let lowered = LoweringPass::new(config).run(&ProgramSpec::new("app").with_type(ty));
    assert!(lowered.diagnostics.is_empty());
    let text = render_program(&lowered, &RenderOptions::default());
    assert!(text.contains("public void push(Vec3? force) {"));
}

#[test]
fn test_diagnostics_follow_type_order_under_parallel_run() {
    let mut program = ProgramSpec::new("app");
    for i in 0..16 {
        program = program.with_type(
            TypeSpec::new(format!("T{:02}", i))
                .method(MethodSpec::new("a").param(ParameterSpec::value("x", "Missing")))
                .method(
                    MethodSpec::new("b")
                        .param(ParameterSpec::value("x", "Int").with_default(Literal::Int(1)))
                        .param(ParameterSpec::value("y", "Int")),
                ),
        );
    }

    let mut config = LoweringConfig::default();
    config.lowering.threads = 8;
    let lowered = LoweringPass::new(config).run(&program);

    assert_eq!(lowered.diagnostics.len(), 32);
    for (i, pair) in lowered.diagnostics.chunks(2).enumerate() {
        let owner = format!("T{:02}", i);
        assert_eq!(pair[0].owner, owner);
        assert_eq!(pair[0].kind, DiagnosticKind::UnsupportedType);
        assert_eq!(pair[1].owner, owner);
        assert_eq!(pair[1].kind, DiagnosticKind::NonTrailingDefault);
    }
    let names: Vec<&str> = lowered.types.iter().map(|t| t.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

use plover_test_suite::*;

#[test]
fn any_expression_is_a_statement() {
    Test::script("1 + 2;").expect(Compiles);
}

#[test]
fn script_function_is_synthesized() {
    Test::script("var x = 2;\nx * 3;")
        .expect(Compiles)
        .expect(Symbol::new("<Eval>$").has(Behavior::HasBody(true)));
}

#[test]
fn global_return_with_value_is_allowed() {
    Test::script("return 4;").expect(Compiles);
}

#[test]
fn later_submissions_see_earlier_declarations() {
    Test::script("var total = 4;\nint Twice(int n) { return n * 2; }")
        .then("total = Twice(total);")
        .then("Twice(total);")
        .expect(Compiles)
        .expect(Symbol::new("total").is(SymbolKind::Variable))
        .expect(Symbol::new("Twice").has(Behavior::HasBody(true)));
}

#[test]
fn later_submissions_may_shadow() {
    Test::script("int value = 1;")
        .then("string value = \"one\";")
        .expect(Compiles)
        .expect(Symbol::new("value").has(Behavior::Type("string")));
}

#[test]
fn errors_stay_with_their_submission() {
    Test::script("Missing();")
        .then("1 + 1;")
        .expect(Compiles);
}

use plover_test_suite::*;

#[test]
fn explicit_conversion_is_reported_as_implicit() {
    Test::new(
        r#"
        int Truncate() {
            decimal x;
            return x;
        }
        "#,
    )
    .expect(HasError("cannot convert from type 'decimal' to 'int' implicitly"))
    .expect(HasErrorCount(1));
}

#[test]
fn identity_overload_beats_widening() {
    Test::new(
        r#"
        int f(int x) { return x; }
        int f(decimal x) { return 0; }
        void main() { f(3); }
        "#,
    )
    .expect(Compiles)
    .expect(Call::to("f").resolves_to("f(int)"));
}

#[test]
fn overload_choice_ignores_declaration_order() {
    Test::new(
        r#"
        decimal f(decimal x) { return x; }
        int f(int x) { return x; }
        void main() { f(3); }
        "#,
    )
    .expect(Compiles)
    .expect(HasWarningCount(0))
    .expect(Call::to("f").resolves_to("f(int)"));
}

#[test]
fn undefined_function_is_one_error() {
    Test::new(
        r#"
        void main() {
            Missing();
        }
        "#,
    )
    .expect(HasError("undefined function 'Missing'"))
    .expect(HasErrorCount(1));
}

#[test]
fn invalid_main_reports_both_problems() {
    Test::new(r#"string main(int argc) { return ""; }"#)
        .expect(HasError("invalid main signature: must return void or int"))
        .expect(HasError("invalid main signature: must take no arguments"))
        .expect(HasErrorCount(2));
}

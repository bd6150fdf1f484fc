use plover_test_suite::*;

#[test]
fn captured_locals_become_parameters() {
    Test::new(
        r#"
        void Outer() {
            int count = 0;
            void Bump() { count++; }
            Bump();
        }
        "#,
    )
    .expect(Compiles)
    .expect(
        Symbol::new("<Outer::Bump>$")
            .is(SymbolKind::Function)
            .has(Behavior::Parameters(&["count"])),
    )
    .expect(Call::to("Bump").resolves_to("<Outer::Bump>$(ref int)"));
}

#[test]
fn parameters_and_own_locals_are_not_captured() {
    Test::new(
        r#"
        int Outer() {
            int Square(int x) { int y = x * x; return y; }
            return Square(3);
        }
        "#,
    )
    .expect(Compiles)
    .expect(Symbol::new("<Outer::Square>$").has(Behavior::Parameters(&["x"])));
}

#[test]
fn called_before_declaration() {
    Test::new(
        r#"
        int Outer() {
            int total = 1;
            int result = Twice();
            int Twice() { return total * 2; }
            return result;
        }
        "#,
    )
    .expect(Compiles)
    .expect(Symbol::new("<Outer::Twice>$").has(Behavior::Parameters(&["total"])));
}

#[test]
fn uncalled_locals_are_still_bound() {
    Test::new(
        r#"
        void Outer() {
            void Unused() { Missing(); }
        }
        "#,
    )
    .expect(HasError("undefined function 'Missing'"));
}

#[test]
fn local_functions_cannot_overload() {
    Test::new(
        r#"
        void Outer() {
            void Inner(int a) { }
            void Inner(bool a) { }
        }
        "#,
    )
    .expect(HasError("cannot overload nested functions; nested function"));
}

#[test]
fn nested_capture_through_two_levels() {
    Test::new(
        r#"
        void Outer() {
            int depth = 0;
            void Middle() {
                void Inner() { depth++; }
                Inner();
            }
            Middle();
        }
        "#,
    )
    .expect(Compiles)
    .expect(Symbol::new("<Outer::Middle::Inner>$").has(Behavior::Parameters(&["depth"])))
    .expect(Symbol::new("<Outer::Middle>$").has(Behavior::Parameters(&["depth"])));
}

#[test]
fn local_function_must_return() {
    Test::new(
        r#"
        void Outer() {
            int Pick(bool first) { if (first) return 1; }
            Pick(true);
        }
        "#,
    )
    .expect(HasError("not all code paths return a value"));
}

use plover_test_suite::*;

mod resolution {
    use super::*;

    #[test]
    fn widening_is_used_when_it_is_the_only_match() {
        Test::new(
            r#"
            decimal Half(decimal x) { return x / 2; }
            void main() { Half(3); }
            "#,
        )
        .expect(Compiles)
        .expect(Call::to("Half").resolves_to("Half(decimal)"));
    }

    #[test]
    fn no_overload_matches() {
        Test::new(
            r#"
            int f(int x) { return x; }
            int f(bool x) { return 0; }
            void main() { f("text"); }
            "#,
        )
        .expect(HasError("no overload for function 'f' matches parameter list"))
        .expect(HasErrorCount(1));
    }

    #[test]
    fn equal_scores_are_ambiguous() {
        Test::new(
            r#"
            void g(decimal x) { }
            void g(any x) { }
            void main() { g(1); }
            "#,
        )
        .expect(HasError("multiple overloads for function 'g' match parameter list"));
    }

    #[test]
    fn has_value_of_null_picks_any() {
        Test::new("void main() { bool present = HasValue(null); }")
            .expect(Compiles)
            .expect(Call::to("HasValue").resolves_to("HasValue(any)"));
    }

    #[test]
    fn candidate_diagnostics_are_discarded() {
        Test::new(
            r#"
            void h(int a) { }
            void h(int a, int b) { }
            void main() { h(1, 2); }
            "#,
        )
        .expect(Compiles)
        .expect(Call::to("h").resolves_to("h(int, int)"));
    }
}

mod arguments {
    use super::*;

    #[test]
    fn defaults_fill_missing_arguments() {
        Test::new(
            r#"
            int add(int a, int b = 2) { return a + b; }
            void main() { add(1); }
            "#,
        )
        .expect(Compiles)
        .expect(Symbol::new("add").is(SymbolKind::Function).has(Behavior::ParameterCount(2)));
    }

    #[test]
    fn named_arguments_reorder() {
        Test::new(
            r#"
            int sub(int a, int b) { return a - b; }
            void main() { sub(b: 1, a: 2); }
            "#,
        )
        .expect(Compiles);
    }

    #[test]
    fn positional_after_named() {
        Test::new(
            r#"
            int sub(int a, int b) { return a - b; }
            void main() { sub(a: 1, 2); }
            "#,
        )
        .expect(HasError("all named arguments must come after any unnamed arguments"));
    }

    #[test]
    fn unknown_parameter_name() {
        Test::new(
            r#"
            int sub(int a, int b) { return a - b; }
            void main() { sub(1, c: 2); }
            "#,
        )
        .expect(HasError("function 'sub' does not have a parameter named 'c'"));
    }

    #[test]
    fn too_many_arguments() {
        Test::new(
            r#"
            int one(int a) { return a; }
            void main() { one(1, 2); }
            "#,
        )
        .expect(HasError("function 'one' expects 1 argument, got 2"));
    }

    #[test]
    fn default_must_be_constant() {
        Test::new(
            r#"
            int pick(int a = RandInt(3)) { return a; }
            "#,
        )
        .expect(HasError("default values for parameters must be compile-time constants"));
    }
}

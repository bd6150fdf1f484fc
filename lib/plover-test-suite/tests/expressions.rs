use plover_test_suite::*;

mod folding {
    use super::*;

    #[test]
    fn divide_by_constant_zero() {
        Test::new("void main() { int x = 10 / 0; }").expect(HasError("cannot divide by zero"));
    }

    #[test]
    fn constant_expressions_fold() {
        Test::new("const int area = 4 * 5 + 2;\nconst bool big = area > 20;")
            .expect(Compiles)
            .expect(Symbol::new("area").has(Behavior::IsConstant(true)))
            .expect(Symbol::new("big").has(Behavior::IsConstant(true)));
    }

    #[test]
    fn short_circuit_on_constant() {
        Test::new("void main() { int x = 1; bool b = false && x > 0; }").expect(Compiles);
    }
}

mod operators {
    use super::*;

    #[test]
    fn undefined_binary_operator() {
        Test::new("void main() { int x = true + 1; }")
            .expect(HasError("operator '+' is not defined for types"));
    }

    #[test]
    fn undefined_unary_operator() {
        Test::new("void main() { bool b = -true; }")
            .expect(HasError("operator '-' is not defined for type"));
    }

    #[test]
    fn is_only_compares_with_null() {
        Test::new("void main() { int x = 1; bool b = x is 2; }")
            .expect(HasError("cannot use 'is' or 'isnt' operators against non-null values"));
    }

    #[test]
    fn is_null_becomes_has_value() {
        Test::new("void main() { int x = 1; bool missing = x is null; bool present = x isnt null; }")
            .expect(Compiles)
            .expect(Call::to("HasValue").resolves_to("HasValue(any)"));
    }

    #[test]
    fn mixed_arithmetic_widens() {
        Test::new("void main() { decimal d = 1 + 2.5; }").expect(Compiles);
    }

    #[test]
    fn ternary() {
        Test::new("void main() { int x = 3; int y = x > 2 ? 1 : 2; }").expect(Compiles);
    }

    #[test]
    fn indexing_a_scalar() {
        Test::new("void main() { int x = 3; int y = x[0]; }")
            .expect(HasError("cannot apply indexing with [] to an expression of type"));
    }
}

mod conversions {
    use super::*;

    #[test]
    fn explicit_cast() {
        Test::new("void main() { int x = (int)2.5; }").expect(Compiles);
    }

    #[test]
    fn narrowing_needs_a_cast() {
        Test::new("void main() { decimal d = 2.5; int x = d; }")
            .expect(HasError("cannot convert from type 'decimal' to 'int' implicitly"));
    }

    #[test]
    fn no_conversion() {
        Test::new("void main() { bool b = 2.5; }")
            .expect(HasError("cannot convert from type"));
    }

    #[test]
    fn string_needs_a_cast() {
        Test::new("void main() { string s = 1; }")
            .expect(HasError("implicitly"));
    }
}

mod names {
    use super::*;

    #[test]
    fn undefined_name() {
        Test::new("void main() { int x = y; }").expect(HasError("undefined symbol 'y'"));
    }

    #[test]
    fn calling_a_variable() {
        Test::new("void main() { int x = 1; x(); }")
            .expect(HasError("called object 'x' is not a function"));
    }
}

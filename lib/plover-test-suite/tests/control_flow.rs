use plover_test_suite::*;

mod returns {
    use super::*;

    #[test]
    fn missing_return_on_one_branch() {
        Test::new(
            r#"
            int Sign(int x) {
                if (x > 0) {
                    return 1;
                }
            }
            "#,
        )
        .expect(HasError("not all code paths return a value"))
        .expect(HasErrorCount(1));
    }

    #[test]
    fn both_branches_return() {
        Test::new(
            r#"
            int Sign(int x) {
                if (x > 0) return 1;
                else return -1;
            }
            "#,
        )
        .expect(Compiles);
    }

    #[test]
    fn constant_true_condition_returns_on_every_path() {
        Test::new("int f() { if (true) return 1; else return 2; }")
            .expect(Compiles)
            .expect(HasWarning("unreachable code"))
            .expect(HasWarningCount(1));
    }

    #[test]
    fn return_inside_conditional_loop_is_not_enough() {
        Test::new(
            r#"
            int First(int x) {
                while (x > 0) {
                    return x;
                }
            }
            "#,
        )
        .expect(HasError("not all code paths return a value"));
    }

    #[test]
    fn infinite_loop_never_falls_off() {
        Test::new(
            r#"
            int Spin() {
                while (true) { }
            }
            "#,
        )
        .expect(Compiles);
    }

    #[test]
    fn code_after_return_is_ignored() {
        Test::new(
            r#"
            int Answer() {
                return 42;
                PrintLine("never");
            }
            "#,
        )
        .expect(Compiles);
    }

    #[test]
    fn void_function_needs_no_return() {
        Test::new("void Log() { PrintLine(\"hi\"); }")
            .expect(Compiles)
            .expect(Symbol::new("Log").has(Behavior::HasBody(true)));
    }

    #[test]
    fn value_in_void_function() {
        Test::new("void Log() { return 1; }")
            .expect(HasError("return statement with a value, in function returning void"));
    }

    #[test]
    fn missing_value_in_int_function() {
        Test::new("int Count() { return; }")
            .expect(HasError("return statement with no value, in function returning non-void"));
    }

    #[test]
    fn global_return_with_value() {
        Test::new("return 1;").expect(HasError("global return cannot return a value"));
    }
}

mod loops {
    use super::*;

    #[test]
    fn break_outside_loop() {
        Test::new("void main() { break; }")
            .expect(HasError("break statement not within a loop"));
    }

    #[test]
    fn continue_outside_loop() {
        Test::new("void main() { continue; }")
            .expect(HasError("continue statement not within a loop"));
    }

    #[test]
    fn every_loop_form() {
        Test::new(
            r#"
            int Sum(int n) {
                int total = 0;
                for (int i = 0; i < n; i++) {
                    if (i == 3) continue;
                    total += i;
                }
                while (total > 100) {
                    total -= 1;
                    if (total == 50) break;
                }
                do {
                    total++;
                } while (total < 10);
                return total;
            }
            "#,
        )
        .expect(Compiles);
    }
}

mod warnings {
    use super::*;

    #[test]
    fn constant_false_branch_is_unreachable() {
        Test::new("void main() { if (false) { PrintLine(); } }")
            .expect(Compiles)
            .expect(HasWarning("unreachable code"));
    }

    #[test]
    fn warnings_can_be_errors() {
        Test::new("void main() { if (false) { PrintLine(); } }")
            .warnings_as_errors()
            .expect(Fails);
    }

    #[test]
    fn comparison_with_null() {
        Test::new("void main() { int x = 1; bool same = x == null; }")
            .expect(HasWarning("expression will always result to 'null'"));
    }
}

mod statements {
    use super::*;

    #[test]
    fn try_needs_catch_or_finally() {
        Test::new("void main() { try { PrintLine(); } }")
            .expect(HasError("try statement must have a catch or finally"));
    }

    #[test]
    fn try_with_finally() {
        Test::new("void main() { try { PrintLine(); } finally { PrintLine(); } }")
            .expect(Compiles);
    }

    #[test]
    fn only_calls_and_assignments_are_statements() {
        Test::new("void main() { 1 + 2; }")
            .expect(HasError("only assignment and call expressions can be used as a statement"));
    }
}

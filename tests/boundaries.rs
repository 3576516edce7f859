#[macro_use]
mod common;

#[cfg(test)]
mod boundaries {
    fn numbered_list(n: usize) -> String {
        (0..n).map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
    }

    #[test]
    fn two_hundred_fifty_five_arguments_is_allowed() {
        let args = numbered_list(255);
        let source = format!(
            "fun f() {{ return 0; }}\nfun sum({args}) {{ return 0; }}\nprint sum({args});",
            args = args
        );
        let mut lox = tlox::Lox::new(Box::new(std::io::sink()));
        assert_eq!(lox.run(&source), tlox::RunOutcome::Ok);
    }

    #[test]
    fn two_hundred_fifty_six_arguments_is_a_parse_error() {
        let args = numbered_list(256);
        let source = format!("f({args});");
        let mut lox = tlox::Lox::new(Box::new(std::io::sink()));
        assert_eq!(lox.run(&source), tlox::RunOutcome::CompileError);
    }

    #[test]
    fn two_hundred_fifty_six_parameters_is_a_parse_error() {
        let params = numbered_list(256).split(", ").map(|n| format!("p{n}")).collect::<Vec<_>>().join(", ");
        let source = format!("fun f({params}) {{}}");
        let mut lox = tlox::Lox::new(Box::new(std::io::sink()));
        assert_eq!(lox.run(&source), tlox::RunOutcome::CompileError);
    }

    tests! {
        arity_mismatch_formats_expected_and_got is ERR
        "fun f(a, b) { return a + b; }
         f(1);",
        "Expected 2 arguments but got 1.",
        " [ Line : 2 ]"
    }

    tests! {
        calling_with_too_many_arguments is ERR
        "fun f(a) { return a; }
         f(1, 2, 3);",
        "Expected 1 arguments but got 3.",
        " [ Line : 2 ]"
    }
}

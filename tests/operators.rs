#[macro_use]
mod common;

#[cfg(test)]
mod operators {
    tests! {
        arithmetic_precedence is OK
        "print 2 + 3 * 4;
         print (2 + 3) * 4;
         print 10 - 2 - 3;",
        "14", "20", "5"
    }

    tests! {
        division_by_zero_is_not_an_error is OK
        "print 1 / 0;
         print -1 / 0;
         print 0 / 0;",
        "inf", "-inf", "NaN"
    }

    tests! {
        string_concatenation is OK
        "print \"foo\" + \"bar\";",
        "foobar"
    }

    tests! {
        unary_negation_and_not is OK
        "print -5;
         print !true;
         print !nil;
         print !0;",
        "-5", "false", "true", "false"
    }

    tests! {
        comparisons_require_numbers is OK
        "print 1 < 2;
         print 2 <= 2;
         print 3 > 2;
         print 3 >= 4;",
        "true", "true", "true", "false"
    }

    tests! {
        equality_across_types is OK
        "print nil == nil;
         print nil == false;
         print 1 == 1;
         print 1 == \"1\";
         print \"a\" == \"a\";",
        "true", "false", "true", "false", "true"
    }

    tests! {
        adding_number_and_string_is_a_runtime_error is ERR
        "print 1 + \"a\";",
        "Operands must be two numbers or two strings.",
        " [ Line : 1 ]"
    }

    tests! {
        subtracting_non_numbers_is_a_runtime_error is ERR
        "print \"a\" - \"b\";",
        "Operands must be numbers.",
        " [ Line : 1 ]"
    }

    tests! {
        negating_a_non_number_is_a_runtime_error is ERR
        "print -\"a\";",
        "Operand must be a number.",
        " [ Line : 1 ]"
    }
}

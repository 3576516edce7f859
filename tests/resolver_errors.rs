#[macro_use]
mod common;

/// Each of these sources fails in the scanner or parser before resolution,
/// or fails resolution itself; either way nothing runs, so the process
/// exits 65 and the diagnostic goes to stderr.
#[cfg(test)]
mod resolver_errors {
    tests! {
        redeclaring_a_local_variable is ERR
        "{ var a = 1; var a = 2; }",
        "[line 1] Error at 'a': Already a variable with this name in this scope."
    }

    tests! {
        reading_a_local_in_its_own_initializer is ERR
        "{ var a = a; }",
        "[line 1] Error at 'a': Cannot read local variable in its own initializer."
    }

    tests! {
        returning_from_top_level is ERR
        "return 1;",
        "[line 1] Error at 'return': Can't return from top-level code."
    }

    tests! {
        returning_a_value_from_an_initializer is ERR
        "class A { init() { return 1; } }",
        "[line 1] Error at 'return': Can't return a value from an initializer."
    }

    tests! {
        this_outside_a_class is ERR
        "print this;",
        "[line 1] Error at 'this': Can't use 'this' outside of a class."
    }

    tests! {
        super_outside_a_class is ERR
        "super.method();",
        "[line 1] Error at 'super': Can't use 'super' outside of a class."
    }

    tests! {
        super_in_a_class_without_a_superclass is ERR
        "class A { method() { super.method(); } }",
        "[line 1] Error at 'super': Can't use 'super' in a class with no superclass."
    }

    tests! {
        class_inheriting_from_itself is ERR
        "class Oops < Oops {}",
        "[line 1] Error at 'Oops': A class can't inherit from itself."
    }

    tests! {
        unterminated_string is ERR
        "var a = \"oops;",
        "[line 1] Error: Unterminated string."
    }

    tests! {
        unexpected_character is ERR
        "var a = 1 @ 2;",
        "[line 1] Error: Unexpected character."
    }

    tests! {
        invalid_assignment_target is ERR
        "1 = 2;",
        "[line 1] Error at '=': Invalid assignment target."
    }
}

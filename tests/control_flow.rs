#[macro_use]
mod common;

#[cfg(test)]
mod control_flow {
    tests! {
        if_without_else is OK
        "if (true) print \"yes\";
         if (false) print \"no\";",
        "yes"
    }

    tests! {
        if_else_branches is OK
        "if (1 > 2) print \"a\"; else print \"b\";",
        "b"
    }

    tests! {
        while_loop_counts_up is OK
        "var i = 0;
         while (i < 3) { print i; i = i + 1; }",
        "0", "1", "2"
    }

    tests! {
        for_loop_desugars_correctly is OK
        "for (var i = 0; i < 3; i = i + 1) print i;",
        "0", "1", "2"
    }

    tests! {
        for_loop_with_omitted_initializer_and_increment is OK
        "var i = 0;
         for (; i < 3;) {
           print i;
           i = i + 1;
         }",
        "0", "1", "2"
    }

    tests! {
        logical_or_short_circuits is OK
        "fun sideEffect() { print \"called\"; return true; }
         print false or \"b\";
         print true or sideEffect();",
        "b", "true"
    }

    tests! {
        logical_and_short_circuits is OK
        "fun sideEffect() { print \"called\"; return true; }
         print true and \"b\";
         print false and sideEffect();",
        "b", "false"
    }

    tests! {
        truthiness_rules is OK
        "if (0) print \"zero is truthy\";
         if (\"\") print \"empty string is truthy\";
         if (nil) print \"nil is falsy\"; else print \"nil else\";
         if (false) print \"false is falsy\"; else print \"false else\";",
        "zero is truthy", "empty string is truthy", "nil else", "false else"
    }
}

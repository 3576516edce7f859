#[macro_use]
mod common;

/// The six canonical scenarios: one integration test each.
#[cfg(test)]
mod scenarios {
    tests! {
        arithmetic_and_print is OK
        "print 1 + 2 * 3;",
        "7"
    }

    tests! {
        global_variable_and_string_concat is OK
        "var a = \"Hello, \"; var b = \"world\"; print a + b;",
        "Hello, world"
    }

    tests! {
        closure_captures_by_reference is OK
        "fun makeCounter() { var i = 0; fun count() { i = i + 1; print i; } return count; }
         var c = makeCounter(); c(); c(); c();",
        "1", "2", "3"
    }

    tests! {
        resolver_shadowing_canonical_example is OK
        "var a = \"global\";
         { fun showA() { print a; } showA(); var a = \"block\"; showA(); }",
        "global", "global"
    }

    tests! {
        class_with_inheritance_and_super is OK
        "class A { method() { print \"A\"; } }
         class B < A { method() { super.method(); print \"B\"; } }
         B().method();",
        "A", "B"
    }

    tests! {
        initializer_returns_this is OK
        "class P { init(x) { this.x = x; } }
         print P(7).x;",
        "7"
    }
}

#[macro_use]
mod common;

#[cfg(test)]
mod closures {
    tests! {
        counter_closure_mutates_captured_variable is OK
        "fun makeCounter() {
           var i = 0;
           fun count() {
             i = i + 1;
             print i;
           }
           return count;
         }
         var c = makeCounter();
         c(); c(); c();",
        "1", "2", "3"
    }

    tests! {
        two_functions_share_the_same_captured_environment is OK
        "fun makeCounter() {
           var i = 0;
           fun increment() { i = i + 1; }
           fun get() { print i; }
           increment();
           increment();
           get();
         }
         makeCounter();",
        "2"
    }

    tests! {
        independent_closures_have_independent_state is OK
        "fun makeCounter() {
           var i = 0;
           fun count() { i = i + 1; print i; }
           return count;
         }
         var a = makeCounter();
         var b = makeCounter();
         a(); a(); b();",
        "1", "2", "1"
    }

    tests! {
        closure_captures_loop_variable_by_binding is OK
        "var fns = nil;
         fun makeAdder(n) {
           fun adder(x) { return x + n; }
           return adder;
         }
         var add5 = makeAdder(5);
         var add10 = makeAdder(10);
         print add5(1);
         print add10(1);",
        "6", "11"
    }

    tests! {
        shadowing_in_block_does_not_affect_already_resolved_closure is OK
        "var a = \"global\";
         {
           fun showA() { print a; }
           showA();
           var a = \"block\";
           showA();
         }",
        "global", "global"
    }
}

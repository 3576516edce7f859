/// Declares one integration test per case. `OK` cases run an inline Lox
/// source string through a fresh interpreter with a captured print sink and
/// compare captured stdout line-by-line; `ERR` cases shell out to the
/// compiled binary (since exit codes and the runtime diagnostic format are
/// a `main.rs` concern, not an `Interpreter` one) against a source file
/// written to a scratch path for the duration of the test.
#[macro_export]
macro_rules! tests {
    ($name:ident is OK $source:expr $(, $expected:expr)* $(,)?) => {
        #[test]
        fn $name() {
            use std::cell::RefCell;
            use std::io::Write;
            use std::rc::Rc;

            let mut expected: Vec<&str> = vec![$($expected),*];
            let expected = if expected.is_empty() {
                String::new()
            } else {
                expected.push("");
                expected.join("\n")
            };

            struct SharedWriter(Rc<RefCell<Vec<u8>>>);
            impl Write for SharedWriter {
                fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                    self.0.borrow_mut().write(buf)
                }
                fn flush(&mut self) -> std::io::Result<()> {
                    Ok(())
                }
            }

            let buffer = Rc::new(RefCell::new(Vec::new()));
            let mut lox = tlox::Lox::new(Box::new(SharedWriter(Rc::clone(&buffer))));
            let outcome = lox.run($source);
            assert_eq!(outcome, tlox::RunOutcome::Ok, "expected {} to run without error", stringify!($name));

            let output = buffer.borrow().clone();
            assert_eq!(expected, String::from_utf8(output).unwrap());
        }
    };

    ($name:ident is ERR $source:expr $(, $expected:expr)+ $(,)?) => {
        #[test]
        fn $name() {
            let expected = vec![$($expected),+].join("\n");
            let path = std::env::temp_dir().join(format!("tlox_{}.lox", stringify!($name)));
            std::fs::write(&path, $source).expect("write scratch source file");

            let result = assert_cmd::Command::cargo_bin("tlox")
                .unwrap()
                .arg(&path)
                .assert()
                .stderr(format!("{expected}\n"))
                .failure();

            let _ = std::fs::remove_file(&path);
            drop(result);
        }
    };
}

use std::panic::{self, AssertUnwindSafe};

use serde::Deserialize;

/// Payload type shared by the scenario tests.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Data {
    pub name: String,
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Runs `f` and checks that it panics with a message containing all `expected_texts`, in
/// the given order.
pub fn expect_fails_with<F>(f: F, expected_texts: Vec<&str>)
where
    F: FnOnce(),
{
    let result = panic::catch_unwind(AssertUnwindSafe(f));

    match result {
        Err(err) => {
            let err_msg: &str = if let Some(err_msg) = err.downcast_ref::<String>() {
                err_msg
            } else if let Some(err_msg) = err.downcast_ref::<&str>() {
                err_msg
            } else {
                panic!(
                    "Expected error message containing:\n{:?}\nBut got a different type of panic.",
                    expected_texts
                );
            };

            let mut start_index = 0;
            for expected_text in &expected_texts {
                if let Some(index) = err_msg[start_index..].find(expected_text) {
                    start_index += index + expected_text.len();
                } else {
                    panic!(
                        "Expected error message to contain in order:\n{:?}\nBut got:\n{}",
                        expected_texts, err_msg
                    );
                }
            }
        }
        _ => panic!(
            "Expected panic with error message containing in order:\n{:?}",
            expected_texts
        ),
    }
}

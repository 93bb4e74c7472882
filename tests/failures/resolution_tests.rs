use std::{cell::Cell, rc::Rc};

use httpflush::{prelude::*, Error};

use crate::utils::expect_fails_with;

#[test]
fn flushing_twice_fails() {
    expect_fails_with(
        || {
            let module = TestingModule::new();
            module.client().get("/data").subscribe_response(|_| {}, |_| {});

            let req = module.controller().expect_one("/data");
            req.flush(ResponseBody::Empty);
            req.flush(ResponseBody::Empty);
        },
        vec!["cannot resolve GET /data (request #0): it has already been resolved"],
    );
}

#[test]
fn second_resolution_never_reaches_the_caller() {
    let module = TestingModule::new();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();

    module.client().get("/data").subscribe_response(
        {
            let counter = counter.clone();
            move |_| counter.set(counter.get() + 1)
        },
        move |_| counter.set(counter.get() + 1),
    );

    let req = module.controller().expect_one("/data");
    req.flush(ResponseBody::Empty);

    assert!(matches!(
        req.try_flush(ResponseBody::Empty),
        Err(Error::AlreadyResolved { .. })
    ));
    assert!(matches!(
        req.try_error(NetworkError::new("late"), ResponseOptions::network()),
        Err(Error::AlreadyResolved { .. })
    ));
    assert!(matches!(
        req.try_flush_with("late", ResponseOptions::new().status(500)),
        Err(Error::AlreadyResolved { .. })
    ));

    assert_eq!(calls.get(), 1);
}

#[test]
fn invalid_status_is_rejected_without_resolving() {
    let module = TestingModule::new();
    module.client().get("/data").subscribe_response(|_| {}, |_| {});

    let req = module.controller().expect_one("/data");

    assert!(matches!(
        req.try_flush_with("x", ResponseOptions::new().status(1000)),
        Err(Error::InvalidResponse(_))
    ));
    assert!(matches!(
        req.try_flush_with("x", ResponseOptions::new().status(0)),
        Err(Error::InvalidResponse(_))
    ));
    assert!(matches!(
        req.try_error(NetworkError::new("x"), ResponseOptions::new()),
        Err(Error::InvalidResponse(_))
    ));
    assert!(!req.is_resolved());

    req.flush(ResponseBody::Empty);
}

#[test]
fn flush_with_invalid_status_panics() {
    expect_fails_with(
        || {
            let module = TestingModule::new();
            module.client().get("/data").subscribe_response(|_| {}, |_| {});
            module
                .controller()
                .expect_one("/data")
                .flush_with("x", ResponseOptions::new().status(1000));
        },
        vec!["invalid mock response: 1000 is not a valid HTTP status code"],
    );
}

use std::{cell::RefCell, rc::Rc};

use httpflush::{prelude::*, ErrorBody};

#[test]
fn text_response_type() {
    let module = TestingModule::new();
    let received = Rc::new(RefCell::new(String::new()));
    let sink = received.clone();

    module
        .client()
        .get("/readme.txt")
        .response_type(ResponseType::Text)
        .subscribe(
            move |text: String| *sink.borrow_mut() = text,
            |err| panic!("unexpected error: {}", err),
        );

    module.controller().expect_one("/readme.txt").flush("hello");
    assert_eq!(*received.borrow(), "hello");
}

#[test]
fn bytes_response_type() {
    let module = TestingModule::new();
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = received.clone();

    module
        .client()
        .get("/image.png")
        .response_type(ResponseType::Bytes)
        .subscribe(
            move |bytes: Vec<u8>| *sink.borrow_mut() = bytes,
            |err| panic!("unexpected error: {}", err),
        );

    module
        .controller()
        .expect_one("/image.png")
        .flush(vec![0x89u8, 0x50, 0x4e, 0x47]);
    assert_eq!(*received.borrow(), vec![0x89, 0x50, 0x4e, 0x47]);
}

#[test]
fn json_text_body_is_parsed() {
    let module = TestingModule::new();
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = received.clone();

    module.client().get("/numbers").subscribe(
        move |numbers: Vec<u32>| *sink.borrow_mut() = numbers,
        |err| panic!("unexpected error: {}", err),
    );

    module.controller().expect_one("/numbers").flush("[1, 2, 3]");
    assert_eq!(*received.borrow(), vec![1, 2, 3]);
}

#[test]
fn mismatched_payload_is_a_parse_error() {
    let module = TestingModule::new();
    let received = Rc::new(RefCell::new(None));
    let sink = received.clone();

    module.client().get("/numbers").subscribe(
        |_: Vec<u32>| panic!("expected a parse error"),
        move |err: HttpErrorResponse| *sink.borrow_mut() = Some(err),
    );

    module
        .controller()
        .expect_one("/numbers")
        .flush(serde_json::json!({ "not": "a list" }));

    let received = received.borrow();
    let err = received.as_ref().unwrap();
    assert_eq!(err.status, 200);
    assert!(matches!(err.error, ErrorBody::Parse(_)));
}

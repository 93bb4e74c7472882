use std::{cell::RefCell, rc::Rc};

use httpflush::{prelude::*, ErrorBody};

use crate::utils::Data;

#[test]
fn flush_with_404_reaches_error_callback() {
    let module = TestingModule::new();
    let client = module.client();
    let controller = module.controller();

    let received: Rc<RefCell<Option<HttpErrorResponse>>> = Rc::new(RefCell::new(None));
    let sink = received.clone();

    client.get("/data").subscribe(
        |_: Data| panic!("should have failed with the 404 error"),
        move |err| *sink.borrow_mut() = Some(err),
    );

    let req = controller.expect_one("/data");
    req.flush_with(
        "deliberate 404 error",
        ResponseOptions::new().status(404).status_text("Not Found"),
    );

    let received = received.borrow();
    let err = received.as_ref().unwrap();
    assert_eq!(err.status, 404, "status");
    assert_eq!(err.status_text, "Not Found");
    assert_eq!(err.error.as_text().unwrap(), "deliberate 404 error", "message");
    assert_eq!(err.message(), "Http failure response for /data: 404 Not Found");
}

#[test]
fn network_error_reaches_error_callback() {
    let module = TestingModule::new();
    let client = module.client();
    let controller = module.controller();

    let received: Rc<RefCell<Option<HttpErrorResponse>>> = Rc::new(RefCell::new(None));
    let sink = received.clone();

    client.get("/data").subscribe(
        |_: Data| panic!("should have failed with the network error"),
        move |err| *sink.borrow_mut() = Some(err),
    );

    let req = controller.expect_one("/data");
    req.error(
        NetworkError::new("simulated network error"),
        ResponseOptions::network(),
    );

    let received = received.borrow();
    let err = received.as_ref().unwrap();
    assert_eq!(err.status, 0);
    assert_eq!(err.status_text, "");
    assert!(err.error.is_network());
    assert_eq!(
        err.error.network_error().unwrap().to_string(),
        "simulated network error"
    );
    assert_eq!(req.resolution(), httpflush::Resolution::Failed);
}

#[test]
fn server_error_carries_json_body() {
    let module = TestingModule::new();
    let received: Rc<RefCell<Option<HttpErrorResponse>>> = Rc::new(RefCell::new(None));
    let sink = received.clone();

    module.client().delete("/data/1").subscribe_response(
        |_| panic!("expected an error"),
        move |err| *sink.borrow_mut() = Some(err),
    );

    module.controller().expect_one("/data/1").flush_with(
        serde_json::json!({ "reason": "locked" }),
        ResponseOptions::new().status(503),
    );

    let received = received.borrow();
    let err = received.as_ref().unwrap();
    assert_eq!(err.status_text, "Service Unavailable");
    match &err.error {
        ErrorBody::Body(ResponseBody::Json(value)) => assert_eq!(value["reason"], "locked"),
        other => panic!("unexpected error body: {:?}", other),
    }
}

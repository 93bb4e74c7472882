use std::{cell::Cell, rc::Rc};

use httpflush::prelude::*;

use crate::utils::expect_fails_with;

#[test]
fn module_verifies_on_drop() {
    expect_fails_with(
        || {
            let module = TestingModule::with_config(TestingConfig::default());
            module
                .client()
                .get("/forgotten")
                .subscribe_response(|_| {}, |_| {});
        },
        vec![
            "expected no open requests, found 1",
            "Unresolved requests (1 request):",
            "GET",
            "/forgotten",
        ],
    );
}

#[test]
fn verify_on_drop_can_be_disabled() {
    let module = TestingModule::with_config(TestingConfig::default().verify_on_drop(false));
    module
        .client()
        .get("/forgotten")
        .subscribe_response(|_| {}, |_| {});
    assert_eq!(module.controller().pending_requests().len(), 1);
}

#[test]
fn failed_assertion_is_not_masked_by_drop_verification() {
    expect_fails_with(
        || {
            let module = TestingModule::with_config(TestingConfig::default());
            module
                .client()
                .get("/data")
                .subscribe_response(|_| {}, |_| {});
            assert_eq!(1, 2, "original assertion");
        },
        vec!["original assertion"],
    );
}

#[test]
fn modules_do_not_share_requests() {
    let first = TestingModule::new();
    let second = TestingModule::new();

    first.client().get("/data").subscribe_response(|_| {}, |_| {});

    second.controller().expect_none("/data");
    second.controller().verify();
    first.controller().expect_one("/data").flush(ResponseBody::Empty);
}

#[test]
fn continuation_can_issue_follow_up_request() {
    let module = TestingModule::new();
    let client = module.client();
    let controller = module.controller();
    let done = Rc::new(Cell::new(false));

    let follow_up_client = client.clone();
    let flag = done.clone();
    client.get("/user").subscribe(
        move |user: serde_json::Value| {
            let id = user["id"].as_u64().unwrap_or_default();
            follow_up_client
                .get(format!("/user/{}/orders", id))
                .subscribe(move |_: Vec<String>| flag.set(true), |_| {});
        },
        |_| {},
    );

    controller.expect_one("/user").flush(serde_json::json!({ "id": 7 }));
    controller.expect_one("/user/7/orders").flush(serde_json::json!([]));

    assert!(done.get());
}

use httpflush::{prelude::*, Error};

use crate::utils::expect_fails_with;

#[test]
fn verify_passes_when_everything_is_resolved() {
    let module = TestingModule::new();
    let client = module.client();
    let controller = module.controller();

    controller.verify();

    for url in ["/a", "/b", "/c"] {
        client.get(url).subscribe_response(|_| {}, |_| {});
    }

    controller.expect_one("/a").flush(ResponseBody::Empty);
    controller
        .expect_one("/b")
        .flush_with("nope", ResponseOptions::new().status(400));
    controller
        .expect_one("/c")
        .error(NetworkError::new("offline"), ResponseOptions::network());

    controller.verify();
}

#[test]
fn verify_lists_unresolved_requests() {
    expect_fails_with(
        || {
            let module = TestingModule::new();
            let client = module.client();
            client.get("/a").subscribe_response(|_| {}, |_| {});
            client
                .post("/b")
                .header("Authorization", "token")
                .subscribe_response(|_| {}, |_| {});

            module.controller().verify();
        },
        vec![
            "expected no open requests, found 2",
            "Unresolved requests (2 requests):",
            "GET",
            "/a",
            "POST",
            "/b",
            "Authorization",
        ],
    );
}

#[test]
fn matched_but_unresolved_requests_still_count() {
    let module = TestingModule::with_config(TestingConfig::default().verify_on_drop(false));
    module.client().get("/data").subscribe_response(|_| {}, |_| {});

    let _req = module.controller().expect_one("/data");

    match module.controller().try_verify() {
        Err(Error::UnresolvedRequests { requests }) => {
            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0].to_string(), "GET /data");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

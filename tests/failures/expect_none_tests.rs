use httpflush::prelude::*;

use crate::utils::expect_fails_with;

#[test]
fn expect_none_passes_without_matches() {
    let module = TestingModule::new();
    module.client().get("/data").subscribe_response(|_| {}, |_| {});

    let controller = module.controller();
    controller.expect_none("/other");
    controller.expect_none(RequestMatcher::method(Method::POST));
    controller.expect_one("/data").flush(ResponseBody::Empty);
}

#[test]
fn expect_none_fails_when_request_matches() {
    expect_fails_with(
        || {
            let module = TestingModule::new();
            module.client().delete("/data/1").subscribe_response(|_| {}, |_| {});
            module
                .controller()
                .expect_none(RequestMatcher::method_url(Method::DELETE, "/data/1"));
        },
        vec![
            "expected zero matching requests for criteria \"Match method: DELETE, URL: /data/1\", found 1",
            "Matching requests (1 request):",
            "DELETE",
            "/data/1",
        ],
    );
}

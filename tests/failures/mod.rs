mod expect_none_tests;
mod resolution_tests;
mod verify_tests;

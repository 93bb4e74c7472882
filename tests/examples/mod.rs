mod http_error_tests;
mod response_type_tests;
mod testing_module_tests;

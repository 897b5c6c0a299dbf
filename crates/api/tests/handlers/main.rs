mod test_utils;

mod middleware_test;
mod service_test;
mod session_test;

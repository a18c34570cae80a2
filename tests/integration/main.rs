//! Integration test suite entry point

mod api_tests;

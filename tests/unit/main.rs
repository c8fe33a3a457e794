//! Unit test suite

mod error_test;

//! Functional test suite for the gateway HTTP surface

mod common;

mod health_test;

//! Tests for the verification session

mod session_tests;

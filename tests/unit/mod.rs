/// Unit tests for the public API
mod basic_tests;

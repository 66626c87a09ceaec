//! Router tests module

mod execution_tests;

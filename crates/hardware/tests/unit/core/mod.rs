//! Core unit tests.

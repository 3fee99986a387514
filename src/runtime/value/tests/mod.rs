//! Tests for the value store

//! Tests that drive the session manager through a mocked voice gateway

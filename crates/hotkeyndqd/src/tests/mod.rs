//! Test suites for the command relay.

pub(crate) mod support;

//! Test suites for the bridge client and its command line.

mod support;

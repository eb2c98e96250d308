#![allow(dead_code, unused_imports)]

pub(crate) mod fake_plutil;
pub(crate) mod test_context;

pub(crate) use fake_plutil::FakePlutil;
pub(crate) use test_context::TestContext;

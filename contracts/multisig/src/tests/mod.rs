pub mod test_helpers;

pub mod registry_test;

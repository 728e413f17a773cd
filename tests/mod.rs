mod support;

mod filter_tests;

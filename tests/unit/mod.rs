/// Unit tests of the public analytics API
mod basic_tests;

//! Integration tests for magnum-recipe-lib.

mod common;
mod package_tests;
mod recipe_tests;

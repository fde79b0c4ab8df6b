mod helpers_tests;
mod option_mapping_tests;
mod translator_tests;

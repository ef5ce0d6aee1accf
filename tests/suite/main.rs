mod einsum_tests;
mod kernel_tests;
mod parser_tests;
mod pattern_tests;
mod plan_tests;

mod submit_test;
mod token_test;

mod cleanup_tests;
mod issuer_tests;

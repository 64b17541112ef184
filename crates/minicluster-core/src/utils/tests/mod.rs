pub mod settings_tests;

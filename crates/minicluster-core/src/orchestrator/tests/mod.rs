pub mod orchestrator_tests;

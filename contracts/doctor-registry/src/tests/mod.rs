// Scenario tests for the doctor onboarding lifecycle
mod utils;

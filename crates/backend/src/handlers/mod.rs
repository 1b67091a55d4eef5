pub mod copilotkit;

mod common;
mod orchestrator;
mod rationale;

pub(crate) mod orchestrator;
pub(crate) mod payload;

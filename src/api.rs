pub mod actions;
pub mod actions_json;
pub mod root;

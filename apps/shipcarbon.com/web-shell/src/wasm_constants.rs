pub(crate) use shipcarbon_client_core::config::SHELL_CONFIG_ELEMENT_ID;
pub(crate) use shipcarbon_client_core::dom_ids::*;
pub(crate) use shipcarbon_client_core::identity::GOOGLE_IDENTITY_SCRIPT_SRC;

pub(crate) const SHELL_PHASE_ATTRIBUTE: &str = "data-shell-phase";
pub(crate) const SCRIPT_LOAD_LISTENER_ATTRIBUTE: &str = "data-shell-load-listener";
pub(crate) const GOOGLE_IDENTITY_API_PATH: [&str; 3] = ["google", "accounts", "id"];
pub(crate) const SUBMITTING_LABEL: &str = "Submitting...";

use super::*;

pub(super) fn set_boot_phase(phase: &str, detail: &str) {
    SHELL_STATE.with(|state| state.borrow_mut().set_phase(phase, detail));
    update_status_dom(phase);
}

pub(super) fn set_boot_error(message: &str) {
    SHELL_STATE.with(|state| state.borrow_mut().set_error(message));
    update_status_dom("error");
    console_warn(&format!("ShipCarbon web shell failed to start: {message}"));
}

pub(super) fn update_status_dom(phase: &str) {
    if let Some(root) = element_by_id(SHELL_ROOT_ID) {
        let _ = root.set_attribute(SHELL_PHASE_ATTRIBUTE, phase);
    }
}

pub(super) fn current_pathname() -> String {
    let Some(window) = web_sys::window() else {
        return "/".to_string();
    };
    let Ok(pathname) = window.location().pathname() else {
        return "/".to_string();
    };
    if pathname.trim().is_empty() {
        "/".to_string()
    } else {
        pathname
    }
}

pub(super) fn read_shell_config_json() -> Option<String> {
    element_by_id(SHELL_CONFIG_ELEMENT_ID)?.text_content()
}

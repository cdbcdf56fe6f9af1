use super::*;

/// Views are rendered by the service, so moving between them is a full page load.
pub(super) fn navigate_to(route: &AppRoute) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let path = route.to_path();
    if current_pathname() == path {
        return;
    }
    if window.location().assign(&path).is_err() {
        console_warn(&format!("failed to navigate to {path}"));
    }
}

pub(super) fn redirect_to(route: &AppRoute) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    window
        .location()
        .replace(&route.to_path())
        .map_err(|_| format!("failed to redirect to {}", route.to_path()))
}

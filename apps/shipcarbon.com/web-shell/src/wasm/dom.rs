use super::*;

pub(super) fn document() -> Result<web_sys::Document, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())
}

pub(super) fn element_by_id(id: &str) -> Option<web_sys::Element> {
    document().ok()?.get_element_by_id(id)
}

pub(super) fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

pub(super) fn set_hidden(id: &str, hidden: bool) {
    let Some(element) = element_by_id(id) else {
        return;
    };
    if hidden {
        let _ = element.set_attribute("hidden", "");
    } else {
        let _ = element.remove_attribute("hidden");
    }
}

pub(super) fn render_mobile_menu(open: bool) {
    set_hidden(MOBILE_MENU_ID, !open);
    let Ok(document) = document() else {
        return;
    };
    let selector = format!("[{ACTION_ATTRIBUTE}=\"{ACTION_TOGGLE_MOBILE_MENU}\"]");
    let Ok(toggles) = document.query_selector_all(&selector) else {
        return;
    };
    let expanded = if open { "true" } else { "false" };
    for index in 0..toggles.length() {
        if let Some(toggle) = toggles
            .item(index)
            .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
        {
            let _ = toggle.set_attribute("aria-expanded", expanded);
        }
    }
}

pub(super) fn render_sign_in_modal(open: bool) {
    set_hidden(SIGN_IN_MODAL_ID, !open);
    set_hidden(SIGN_IN_OVERLAY_ID, !open);
    if !open {
        render_sign_in_error(None);
    }
}

pub(super) fn render_sign_in_error(message: Option<&str>) {
    let Some(slot) = element_by_id(SIGN_IN_ERROR_ID) else {
        return;
    };
    slot.set_text_content(message);
    set_hidden(SIGN_IN_ERROR_ID, message.is_none());
}

pub(super) fn input_value(id: &str) -> String {
    element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

pub(super) fn set_input_value(id: &str, value: &str) {
    if let Some(input) =
        element_by_id(id).and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value(value);
    }
}

pub(super) fn textarea_value(id: &str) -> String {
    element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlTextAreaElement>().ok())
        .map(|textarea| textarea.value())
        .unwrap_or_default()
}

pub(super) fn render_access_request_view() {
    let view = SHELL_STATE.with(|state| state.borrow().form.as_ref().map(AccessRequestForm::view));
    let Some(view) = view else {
        return;
    };
    match view {
        FormView::Form {
            error, submitting, ..
        } => {
            if let Some(slot) = element_by_id(ACCESS_REQUEST_ERROR_ID) {
                slot.set_text_content(error.as_deref());
            }
            set_hidden(ACCESS_REQUEST_ERROR_ID, error.is_none());
            if let Some(button) = element_by_id(ACCESS_REQUEST_SUBMIT_ID)
                .and_then(|element| element.dyn_into::<HtmlButtonElement>().ok())
            {
                button.set_disabled(submitting);
                let label = if submitting {
                    SUBMITTING_LABEL
                } else {
                    shipcarbon_client_core::access_request::SUBMIT_LABEL
                };
                button.set_text_content(Some(label));
            }
        }
        FormView::Confirmation {
            heading,
            body,
            return_label,
            ..
        } => {
            if let Err(error) = render_confirmation(heading, body, return_label) {
                console_warn(&format!("failed to render confirmation: {error}"));
            }
        }
    }
}

fn render_confirmation(heading: &str, body: &str, return_label: &str) -> Result<(), String> {
    let document = document()?;
    let container = document
        .get_element_by_id(ACCESS_REQUEST_VIEW_ID)
        .ok_or_else(|| "access request view is missing".to_string())?;

    let title = document
        .create_element("h2")
        .map_err(|_| "failed to create confirmation heading".to_string())?;
    title.set_text_content(Some(heading));

    let message = document
        .create_element("p")
        .map_err(|_| "failed to create confirmation body".to_string())?;
    message.set_text_content(Some(body));

    let button = document
        .create_element("button")
        .map_err(|_| "failed to create return button".to_string())?;
    button
        .set_attribute("type", "button")
        .map_err(|_| "failed to set return button type".to_string())?;
    button
        .set_attribute(ACTION_ATTRIBUTE, ACTION_RETURN_TO_DASHBOARD)
        .map_err(|_| "failed to set return button action".to_string())?;
    button.set_text_content(Some(return_label));

    container.set_text_content(None);
    container
        .set_attribute("data-state", "submitted")
        .map_err(|_| "failed to mark confirmation state".to_string())?;
    for child in [&title, &message, &button] {
        container
            .append_child(child)
            .map_err(|_| "failed to append confirmation element".to_string())?;
    }
    Ok(())
}

/// First `data-action` found on the event path, innermost element first.
pub(super) fn action_from_event(event: &web_sys::Event) -> Option<String> {
    let composed_path = event.composed_path();
    for index in 0..composed_path.length() {
        let value = composed_path.get(index);
        if let Ok(element) = value.dyn_into::<web_sys::Element>() {
            if let Some(action) = element.get_attribute(ACTION_ATTRIBUTE) {
                return Some(action);
            }
        }
    }
    None
}

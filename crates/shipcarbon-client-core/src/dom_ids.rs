//! Element ids and `data-action` values shared by the server-rendered markup and the
//! browser shell that enhances it.

pub const SHELL_ROOT_ID: &str = "shipcarbon-shell";
pub const MOBILE_MENU_ID: &str = "mobile-menu";
pub const SIGN_IN_MODAL_ID: &str = "sign-in-modal";
pub const SIGN_IN_OVERLAY_ID: &str = "sign-in-overlay";
pub const SIGN_IN_ERROR_ID: &str = "sign-in-error";
pub const ACCESS_REQUEST_VIEW_ID: &str = "access-request-view";
pub const ACCESS_REQUEST_FORM_ID: &str = "access-request-form";
pub const ACCESS_REQUEST_EMAIL_ID: &str = "access-request-email";
pub const ACCESS_REQUEST_PURPOSE_ID: &str = "access-request-purpose";
pub const ACCESS_REQUEST_ERROR_ID: &str = "access-request-error";
pub const ACCESS_REQUEST_SUBMIT_ID: &str = "access-request-submit";

pub const ACTION_ATTRIBUTE: &str = "data-action";
pub const ACTION_OPEN_SIGN_IN: &str = "open-sign-in";
pub const ACTION_CLOSE_SIGN_IN: &str = "close-sign-in";
pub const ACTION_TOGGLE_MOBILE_MENU: &str = "toggle-mobile-menu";
pub const ACTION_RETURN_TO_DASHBOARD: &str = "return-to-dashboard";

use serde::{Deserialize, Serialize};

pub const LANDING_PATH: &str = "/";
pub const DASHBOARD_HOME_PATH: &str = "/dashboard-home";
pub const REQUEST_FORM_PATH: &str = "/request_form";
/// Older dashboard builds link here; it renders the request form.
pub const REQUEST_FORM_ALIAS_PATH: &str = "/request-api";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum AppRoute {
    Landing,
    DashboardHome,
    RequestForm,
    NotFound { path: String },
}

impl AppRoute {
    #[must_use]
    pub fn from_path(raw: &str) -> Self {
        let path = normalize_route_path(raw);
        match path.as_str() {
            LANDING_PATH => Self::Landing,
            DASHBOARD_HOME_PATH => Self::DashboardHome,
            REQUEST_FORM_PATH | REQUEST_FORM_ALIAS_PATH => Self::RequestForm,
            _ => Self::NotFound { path },
        }
    }

    #[must_use]
    pub fn to_path(&self) -> String {
        match self {
            Self::Landing => LANDING_PATH.to_string(),
            Self::DashboardHome => DASHBOARD_HOME_PATH.to_string(),
            Self::RequestForm => REQUEST_FORM_PATH.to_string(),
            Self::NotFound { path } => path.clone(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Landing => "Maritime Emissions Analysis Platform",
            Self::DashboardHome => "Dashboard",
            Self::RequestForm => "Request API Access",
            Self::NotFound { .. } => "Page Not Found",
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Whether guarded views need a stored credential. The shipped default leaves every view
/// reachable without one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteGuard {
    #[default]
    Open,
    RequireCredential,
}

impl RouteGuard {
    #[must_use]
    pub fn protects(self, route: &AppRoute) -> bool {
        match self {
            Self::Open => false,
            Self::RequireCredential => {
                matches!(route, AppRoute::DashboardHome | AppRoute::RequestForm)
            }
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::RequireCredential => "require_credential",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResolution {
    Render(AppRoute),
    Redirect(AppRoute),
}

#[must_use]
pub fn resolve_route(path: &str, guard: RouteGuard, has_credential: bool) -> RouteResolution {
    let route = AppRoute::from_path(path);
    if guard.protects(&route) && !has_credential {
        return RouteResolution::Redirect(AppRoute::Landing);
    }
    RouteResolution::Render(route)
}

#[must_use]
pub fn is_internal_route_path(path: &str) -> bool {
    !AppRoute::from_path(path).is_not_found()
}

/// Drops query and fragment, collapses a trailing slash, and defaults to `/`.
#[must_use]
pub fn normalize_route_path(raw: &str) -> String {
    let before_query = raw.trim().split('?').next().unwrap_or_default();
    let path = before_query.split('#').next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return LANDING_PATH.to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

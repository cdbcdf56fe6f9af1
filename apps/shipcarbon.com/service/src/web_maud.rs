use maud::{DOCTYPE, Markup, PreEscaped, html};
use shipcarbon_client_core::access_request::{FORM_HEADING, PURPOSE_PLACEHOLDER, SUBMIT_LABEL};
use shipcarbon_client_core::config::SHELL_CONFIG_ELEMENT_ID;
use shipcarbon_client_core::content::{
    CTA_BODY, CTA_BUTTON_LABEL, CTA_HEADING, CardTarget, DASHBOARD_CARDS, DASHBOARD_HEADING,
    DashboardCard, EMISSIONS_BY_SHIP_TYPE, FEATURES, FOOTER_ABOUT, FOOTER_CONTACT, HERO_CTA_LABEL,
    HERO_TAGLINE, HISTORICAL_TRENDS, NAV_LINKS, NOT_FOUND_BODY, NOT_FOUND_HEADING, PRODUCT_NAME,
    SIGN_IN_LABEL, trend_reduction_percent,
};
use shipcarbon_client_core::dom_ids::{
    ACCESS_REQUEST_EMAIL_ID, ACCESS_REQUEST_ERROR_ID, ACCESS_REQUEST_FORM_ID,
    ACCESS_REQUEST_PURPOSE_ID, ACCESS_REQUEST_SUBMIT_ID, ACCESS_REQUEST_VIEW_ID,
    ACTION_CLOSE_SIGN_IN, ACTION_OPEN_SIGN_IN, ACTION_TOGGLE_MOBILE_MENU, MOBILE_MENU_ID,
    SHELL_ROOT_ID, SIGN_IN_ERROR_ID, SIGN_IN_MODAL_ID, SIGN_IN_OVERLAY_ID,
};
use shipcarbon_client_core::identity::SIGN_IN_CONTAINER_ID;
use shipcarbon_client_core::routes::{DASHBOARD_HOME_PATH, LANDING_PATH, REQUEST_FORM_PATH};

const WEB_SHELL_MODULE_PATH: &str = "/assets/shipcarbon_web_shell.js";

#[derive(Debug, Clone)]
pub enum WebBody {
    Landing,
    DashboardHome {
        docs_url: String,
        analytics_dashboard_url: String,
    },
    RequestForm {
        initial_email: String,
    },
    NotFound {
        path: String,
    },
}

#[derive(Debug, Clone)]
pub struct WebPage {
    pub title: String,
    /// Already escaped for embedding inside a `<script>` element.
    pub shell_config_json: String,
    pub body: WebBody,
}

pub fn render_page(page: &WebPage) -> String {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (page.title) " | ShipCarbon" }
                style { (PreEscaped(styles())) }
                script type="application/json" id=(SHELL_CONFIG_ELEMENT_ID) {
                    (PreEscaped(&page.shell_config_json))
                }
                script type="module" {
                    (PreEscaped(format!("import init from '{WEB_SHELL_MODULE_PATH}'; init();")))
                }
            }
            body {
                div id=(SHELL_ROOT_ID) class="sc-app" data-shell-phase="server" {
                    (topbar())
                    main class="sc-main" {
                        @match &page.body {
                            WebBody::Landing => {
                                (landing_body())
                            }
                            WebBody::DashboardHome { docs_url, analytics_dashboard_url } => {
                                (dashboard_body(docs_url, analytics_dashboard_url))
                            }
                            WebBody::RequestForm { initial_email } => {
                                (request_form_body(initial_email))
                            }
                            WebBody::NotFound { path } => {
                                (not_found_body(path))
                            }
                        }
                    }
                    (footer())
                    (sign_in_modal())
                }
            }
        }
    };

    markup.into_string()
}

fn topbar() -> Markup {
    html! {
        header class="sc-topbar" {
            a class="sc-brand" href=(LANDING_PATH) { (PRODUCT_NAME) }
            nav class="sc-nav" {
                @for link in NAV_LINKS {
                    a class="sc-nav-link" href={ (LANDING_PATH) (link.href) } { (link.label) }
                }
                button type="button" class="sc-btn" data-action=(ACTION_OPEN_SIGN_IN) {
                    (SIGN_IN_LABEL)
                }
            }
            button type="button"
                class="sc-menu-toggle"
                aria-controls=(MOBILE_MENU_ID)
                aria-expanded="false"
                data-action=(ACTION_TOGGLE_MOBILE_MENU) { "Menu" }
        }
        nav id=(MOBILE_MENU_ID) class="sc-mobile-menu" hidden {
            @for link in NAV_LINKS {
                a href={ (LANDING_PATH) (link.href) } { (link.label) }
            }
            button type="button" class="sc-btn" data-action=(ACTION_OPEN_SIGN_IN) {
                (SIGN_IN_LABEL)
            }
        }
    }
}

fn landing_body() -> Markup {
    html! {
        section class="sc-hero" {
            h1 { (PRODUCT_NAME) }
            p { (HERO_TAGLINE) }
            a class="sc-btn primary" href=(REQUEST_FORM_PATH) { (HERO_CTA_LABEL) }
        }
        section id="features" class="sc-section" {
            h2 { "Key Features" }
            div class="sc-grid three" {
                @for feature in FEATURES {
                    article id=(feature.anchor)
                        class={(if feature.available { "sc-card" } else { "sc-card disabled" })}
                        aria-disabled=[(!feature.available).then_some("true")] {
                        h3 { (feature.title) }
                        p { (feature.description) }
                    }
                }
            }
        }
        section class="sc-section" {
            h2 { "Data Insights" }
            div class="sc-grid two" {
                (emissions_table())
                (trends_table())
            }
        }
        section class="sc-cta" {
            h2 { (CTA_HEADING) }
            p { (CTA_BODY) }
            button type="button" class="sc-btn primary" data-action=(ACTION_OPEN_SIGN_IN) {
                (CTA_BUTTON_LABEL)
            }
        }
    }
}

fn emissions_table() -> Markup {
    html! {
        table class="sc-table" {
            caption { "Emissions by Ship Type (tonnes CO2)" }
            thead {
                tr { th { "Month" } th { "Cargo" } th { "Passenger" } th { "Tanker" } th { "Total" } }
            }
            tbody {
                @for row in EMISSIONS_BY_SHIP_TYPE {
                    tr {
                        td { (row.month) }
                        td { (row.cargo) }
                        td { (row.passenger) }
                        td { (row.tanker) }
                        td { (row.total()) }
                    }
                }
            }
        }
    }
}

fn trends_table() -> Markup {
    html! {
        table class="sc-table" {
            caption { "Historical Emission Trends" }
            thead { tr { th { "Year" } th { "Emissions" } } }
            tbody {
                @for row in HISTORICAL_TRENDS {
                    tr { td { (row.year) } td { (row.emissions) } }
                }
            }
            @if let Some(percent) = trend_reduction_percent(&HISTORICAL_TRENDS) {
                tfoot { tr { td colspan="2" { (percent) "% reduction since " (HISTORICAL_TRENDS[0].year) } } }
            }
        }
    }
}

fn dashboard_body(docs_url: &str, analytics_dashboard_url: &str) -> Markup {
    html! {
        section class="sc-section" {
            h1 { (DASHBOARD_HEADING) }
            div class="sc-grid three" {
                @for card in DASHBOARD_CARDS {
                    (dashboard_card(&card, docs_url, analytics_dashboard_url))
                }
            }
        }
    }
}

fn dashboard_card(card: &DashboardCard, docs_url: &str, analytics_dashboard_url: &str) -> Markup {
    let href = match card.target {
        CardTarget::RequestForm => REQUEST_FORM_PATH,
        CardTarget::Docs => docs_url,
        CardTarget::AnalyticsDashboard => analytics_dashboard_url,
    };
    html! {
        article class="sc-card" {
            h3 { (card.title) }
            p { (card.description) }
            a class="sc-btn primary" href=(href) { (card.action_label) }
        }
    }
}

fn request_form_body(initial_email: &str) -> Markup {
    html! {
        section id=(ACCESS_REQUEST_VIEW_ID) class="sc-card sc-form-card" data-state="editing" {
            h1 { (FORM_HEADING) }
            form id=(ACCESS_REQUEST_FORM_ID) class="sc-form" {
                label for=(ACCESS_REQUEST_EMAIL_ID) { "Email" }
                input id=(ACCESS_REQUEST_EMAIL_ID)
                    type="email"
                    name="email"
                    value=(initial_email)
                    placeholder="you@example.com";
                label for=(ACCESS_REQUEST_PURPOSE_ID) { "Purpose of API Usage" }
                textarea id=(ACCESS_REQUEST_PURPOSE_ID)
                    name="purpose"
                    rows="4"
                    placeholder=(PURPOSE_PLACEHOLDER)
                    required {}
                p id=(ACCESS_REQUEST_ERROR_ID) class="sc-error" role="alert" hidden {}
                button id=(ACCESS_REQUEST_SUBMIT_ID) type="submit" class="sc-btn primary" {
                    (SUBMIT_LABEL)
                }
            }
            a class="sc-link" href=(DASHBOARD_HOME_PATH) { "Back to dashboard" }
        }
    }
}

fn not_found_body(path: &str) -> Markup {
    html! {
        section class="sc-card sc-not-found" {
            h1 { (NOT_FOUND_HEADING) }
            p { (NOT_FOUND_BODY) }
            p class="sc-muted" { code { (path) } }
            a class="sc-btn" href=(LANDING_PATH) { "Back to home" }
        }
    }
}

fn footer() -> Markup {
    html! {
        footer class="sc-footer" {
            div {
                h4 { "About" }
                p { (FOOTER_ABOUT) }
            }
            div {
                h4 { "Quick Links" }
                @for link in NAV_LINKS {
                    a href={ (LANDING_PATH) (link.href) } { (link.label) }
                }
            }
            div {
                h4 { "Contact" }
                p { (FOOTER_CONTACT) }
            }
        }
    }
}

fn sign_in_modal() -> Markup {
    html! {
        div id=(SIGN_IN_OVERLAY_ID) class="sc-overlay" data-action=(ACTION_CLOSE_SIGN_IN) hidden {}
        div id=(SIGN_IN_MODAL_ID) class="sc-modal" role="dialog" aria-modal="true" aria-labelledby="sign-in-title" hidden {
            button type="button" class="sc-modal-close" aria-label="Close" data-action=(ACTION_CLOSE_SIGN_IN) { "×" }
            h2 id="sign-in-title" { "Sign in to continue" }
            div id=(SIGN_IN_CONTAINER_ID) {}
            p id=(SIGN_IN_ERROR_ID) class="sc-error" role="alert" hidden {}
        }
    }
}

fn styles() -> &'static str {
    r#"
:root {
  --bg: #f4f8fb;
  --ink: #0f2a3d;
  --muted: #5b7386;
  --accent: #0b7a75;
  --accent-ink: #ffffff;
  --card: #ffffff;
  --line: #d5e1ea;
  --danger: #b42318;
}
* { box-sizing: border-box; }
body { margin: 0; background: var(--bg); color: var(--ink); font-family: "Inter", system-ui, sans-serif; }
.sc-topbar { display: flex; align-items: center; justify-content: space-between; padding: 1rem 1.5rem; border-bottom: 1px solid var(--line); background: var(--card); }
.sc-brand { font-weight: 700; color: var(--ink); text-decoration: none; }
.sc-nav { display: flex; gap: 1rem; align-items: center; }
.sc-nav-link { color: var(--muted); text-decoration: none; }
.sc-menu-toggle { display: none; }
.sc-mobile-menu { display: grid; gap: 0.5rem; padding: 1rem 1.5rem; background: var(--card); border-bottom: 1px solid var(--line); }
.sc-mobile-menu[hidden] { display: none; }
.sc-main { max-width: 1100px; margin: 0 auto; padding: 2rem 1.5rem; }
.sc-hero { text-align: center; padding: 3rem 0; }
.sc-section { margin: 2.5rem 0; }
.sc-grid { display: grid; gap: 1rem; }
.sc-grid.two { grid-template-columns: repeat(2, 1fr); }
.sc-grid.three { grid-template-columns: repeat(3, 1fr); }
.sc-card { background: var(--card); border: 1px solid var(--line); border-radius: 12px; padding: 1.25rem; }
.sc-card.disabled { opacity: 0.55; }
.sc-table { width: 100%; border-collapse: collapse; background: var(--card); }
.sc-table th, .sc-table td { padding: 0.45rem 0.6rem; border-bottom: 1px solid var(--line); text-align: left; }
.sc-cta { text-align: center; padding: 2.5rem 1rem; background: var(--card); border-radius: 12px; }
.sc-btn { display: inline-block; padding: 0.55rem 1rem; border-radius: 8px; border: 1px solid var(--accent); background: transparent; color: var(--accent); cursor: pointer; text-decoration: none; font: inherit; }
.sc-btn.primary { background: var(--accent); color: var(--accent-ink); }
.sc-btn[disabled] { opacity: 0.6; cursor: progress; }
.sc-form { display: grid; gap: 0.6rem; }
.sc-form input, .sc-form textarea { font: inherit; padding: 0.55rem; border: 1px solid var(--line); border-radius: 8px; }
.sc-form-card { max-width: 560px; margin: 0 auto; }
.sc-error { color: var(--danger); margin: 0; }
.sc-muted { color: var(--muted); }
.sc-footer { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; padding: 2rem 1.5rem; border-top: 1px solid var(--line); background: var(--card); }
.sc-footer a { display: block; color: var(--muted); }
.sc-overlay { position: fixed; inset: 0; background: rgba(15, 42, 61, 0.45); }
.sc-modal { position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%); width: min(420px, 92vw); background: var(--card); border-radius: 12px; padding: 1.5rem; }
.sc-modal-close { position: absolute; top: 0.5rem; right: 0.75rem; border: 0; background: none; font-size: 1.4rem; cursor: pointer; }
[hidden] { display: none !important; }
@media (max-width: 820px) {
  .sc-nav { display: none; }
  .sc-menu-toggle { display: inline-block; }
  .sc-grid.two, .sc-grid.three, .sc-footer { grid-template-columns: 1fr; }
}
"#
}

#[cfg(test)]
mod tests {
    use super::{WEB_SHELL_MODULE_PATH, WebBody, WebPage, render_page};
    use shipcarbon_client_core::config::ShellConfig;

    fn page(body: WebBody) -> WebPage {
        WebPage {
            title: "Test".to_string(),
            shell_config_json: ShellConfig::default()
                .to_embedded_json()
                .expect("shell config json"),
            body,
        }
    }

    #[test]
    fn render_page_embeds_shell_config_and_module() {
        let html = render_page(&page(WebBody::Landing));
        assert!(html.contains("id=\"shipcarbon-shell-config\""));
        assert!(html.contains("type=\"application/json\""));
        assert!(html.contains(WEB_SHELL_MODULE_PATH));
        assert!(html.contains("id=\"shipcarbon-shell\""));
        assert!(html.contains("id=\"googleSignInDiv\""));
    }

    #[test]
    fn landing_lists_features_insights_and_cta() {
        let html = render_page(&page(WebBody::Landing));
        assert!(html.contains("Request API Access"));
        assert!(html.contains("Detailed Reports (Coming soon)"));
        assert!(html.contains("aria-disabled=\"true\""));
        assert!(html.contains("Ready to Get Started?"));
        assert!(html.contains("Emissions by Ship Type"));
        assert!(html.contains("2019"));
    }

    fn tag_containing<'a>(html: &'a str, marker: &str) -> &'a str {
        let at = html.find(marker).expect("marker present");
        let start = html[..at].rfind('<').expect("tag start");
        let end = at + html[at..].find('>').expect("tag end");
        &html[start..=end]
    }

    #[test]
    fn dashboard_cards_link_to_configured_destinations() {
        let html = render_page(&page(WebBody::DashboardHome {
            docs_url: "https://docs.example/ref".to_string(),
            analytics_dashboard_url: "https://analytics.example/d/1".to_string(),
        }));
        assert!(html.contains("Welcome to the Maritime Emissions Analysis Platform"));
        assert!(html.contains("href=\"/request_form\""));
        assert!(html.contains("href=\"https://docs.example/ref\""));
        assert!(html.contains("href=\"https://analytics.example/d/1\""));
        assert!(!html.contains("target=\"_blank\""));
    }

    #[test]
    fn request_form_prefills_email_and_requires_purpose() {
        let html = render_page(&page(WebBody::RequestForm {
            initial_email: "user@example.com".to_string(),
        }));
        assert!(html.contains("Submit API Access Request"));
        assert!(html.contains("Purpose of API Usage"));

        let email = tag_containing(&html, "id=\"access-request-email\"");
        assert!(email.starts_with("<input"));
        assert!(email.contains("value=\"user@example.com\""));
        assert!(!email.contains("required"));

        let purpose = tag_containing(&html, "id=\"access-request-purpose\"");
        assert!(purpose.starts_with("<textarea"));
        assert!(purpose.contains(" required"));
        assert!(purpose.contains("placeholder=\"Briefly describe how you plan to use the API\""));

        let form = tag_containing(&html, "id=\"access-request-form\"");
        assert!(form.starts_with("<form"));
        assert!(!form.contains(" action="));
        assert!(!form.contains(" method="));
    }

    #[test]
    fn not_found_escapes_requested_path() {
        let html = render_page(&page(WebBody::NotFound {
            path: "/<script>".to_string(),
        }));
        assert!(html.contains("Page not found"));
        assert!(html.contains("/&lt;script&gt;"));
    }
}

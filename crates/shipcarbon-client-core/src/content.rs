//! Static copy and demo datasets shown by the views.

use serde::Serialize;

pub const PRODUCT_NAME: &str = "Maritime Emissions Analysis Platform";
pub const HERO_TAGLINE: &str =
    "Comprehensive insights for maritime emissions monitoring and optimization";
pub const HERO_CTA_LABEL: &str = "Request API Access";
pub const SIGN_IN_LABEL: &str = "Sign In";
pub const CTA_HEADING: &str = "Ready to Get Started?";
pub const CTA_BODY: &str =
    "Sign in to request API access and explore emissions data for your fleet.";
pub const CTA_BUTTON_LABEL: &str = "Create Account";
pub const FOOTER_ABOUT: &str = "Helping the maritime industry monitor and reduce emissions.";
pub const FOOTER_CONTACT: &str = "Get in touch for support or feedback";
pub const DASHBOARD_HEADING: &str = "Welcome to the Maritime Emissions Analysis Platform";
pub const NOT_FOUND_HEADING: &str = "Page not found";
pub const NOT_FOUND_BODY: &str = "The page you were looking for does not exist.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

pub const NAV_LINKS: [NavLink; 3] = [
    NavLink {
        label: "Features",
        href: "#features",
    },
    NavLink {
        label: "API Docs",
        href: "#api-docs",
    },
    NavLink {
        label: "Dashboard",
        href: "#dashboard",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub anchor: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub available: bool,
}

pub const FEATURES: [Feature; 3] = [
    Feature {
        anchor: "api-docs",
        title: "RESTful API",
        description: "Access emissions data programmatically with a documented REST API.",
        available: true,
    },
    Feature {
        anchor: "dashboard",
        title: "Interactive Dashboard",
        description: "Explore fleet emissions with filters, trends, and comparisons.",
        available: true,
    },
    Feature {
        anchor: "reports",
        title: "Detailed Reports (Coming soon)",
        description: "Generate compliance-ready emissions reports for your vessels.",
        available: false,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmissionsByShipType {
    pub month: &'static str,
    pub cargo: u32,
    pub passenger: u32,
    pub tanker: u32,
}

impl EmissionsByShipType {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.cargo + self.passenger + self.tanker
    }
}

pub const EMISSIONS_BY_SHIP_TYPE: [EmissionsByShipType; 5] = [
    EmissionsByShipType {
        month: "Jan",
        cargo: 450,
        passenger: 380,
        tanker: 520,
    },
    EmissionsByShipType {
        month: "Feb",
        cargo: 470,
        passenger: 390,
        tanker: 510,
    },
    EmissionsByShipType {
        month: "Mar",
        cargo: 540,
        passenger: 400,
        tanker: 580,
    },
    EmissionsByShipType {
        month: "Apr",
        cargo: 580,
        passenger: 420,
        tanker: 620,
    },
    EmissionsByShipType {
        month: "May",
        cargo: 620,
        passenger: 450,
        tanker: 670,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoricalTrend {
    pub year: u16,
    pub emissions: u32,
}

pub const HISTORICAL_TRENDS: [HistoricalTrend; 5] = [
    HistoricalTrend {
        year: 2019,
        emissions: 1000,
    },
    HistoricalTrend {
        year: 2020,
        emissions: 950,
    },
    HistoricalTrend {
        year: 2021,
        emissions: 880,
    },
    HistoricalTrend {
        year: 2022,
        emissions: 820,
    },
    HistoricalTrend {
        year: 2023,
        emissions: 750,
    },
];

/// Percentage drop between the first and last trend points, rounded down.
#[must_use]
pub fn trend_reduction_percent(trends: &[HistoricalTrend]) -> Option<u32> {
    let first = trends.first()?.emissions;
    let last = trends.last()?.emissions;
    if first == 0 || last > first {
        return None;
    }
    let percent = u64::from(first - last) * 100 / u64::from(first);
    u32::try_from(percent).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTarget {
    RequestForm,
    Docs,
    AnalyticsDashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardCard {
    pub title: &'static str,
    pub description: &'static str,
    pub action_label: &'static str,
    pub target: CardTarget,
}

pub const DASHBOARD_CARDS: [DashboardCard; 3] = [
    DashboardCard {
        title: "Request API Access",
        description: "Get access to our API to retrieve and analyze maritime emissions data.",
        action_label: "Request Access",
        target: CardTarget::RequestForm,
    },
    DashboardCard {
        title: "Read API Documentation",
        description: "Explore our detailed documentation to get started with API integration.",
        action_label: "Read Docs",
        target: CardTarget::Docs,
    },
    DashboardCard {
        title: "Open Dashboard",
        description: "View real-time data and insights on maritime emissions in the dashboard.",
        action_label: "Go to Dashboard",
        target: CardTarget::AnalyticsDashboard,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emissions_dataset_covers_january_to_may() {
        let months: Vec<_> = EMISSIONS_BY_SHIP_TYPE.iter().map(|row| row.month).collect();
        assert_eq!(months, ["Jan", "Feb", "Mar", "Apr", "May"]);
        assert_eq!(EMISSIONS_BY_SHIP_TYPE[0].total(), 1350);
        assert_eq!(EMISSIONS_BY_SHIP_TYPE[4].tanker, 670);
    }

    #[test]
    fn historical_trend_declines_by_a_quarter() {
        assert_eq!(trend_reduction_percent(&HISTORICAL_TRENDS), Some(25));
        assert_eq!(trend_reduction_percent(&[]), None);
    }

    #[test]
    fn only_reports_feature_is_unavailable() {
        let unavailable: Vec<_> = FEATURES
            .iter()
            .filter(|feature| !feature.available)
            .map(|feature| feature.title)
            .collect();
        assert_eq!(unavailable, ["Detailed Reports (Coming soon)"]);
    }

    #[test]
    fn large_emission_figures_do_not_overflow() {
        let trends = [
            HistoricalTrend {
                year: 2019,
                emissions: 4_000_000_000,
            },
            HistoricalTrend {
                year: 2023,
                emissions: 1_000_000_000,
            },
        ];
        assert_eq!(trend_reduction_percent(&trends), Some(75));
    }

    #[test]
    fn dashboard_cards_follow_request_docs_dashboard_order() {
        let targets: Vec<_> = DASHBOARD_CARDS.iter().map(|card| card.target).collect();
        assert_eq!(
            targets,
            [
                CardTarget::RequestForm,
                CardTarget::Docs,
                CardTarget::AnalyticsDashboard
            ]
        );
        assert_eq!(DASHBOARD_CARDS[2].action_label, "Go to Dashboard");
    }
}

//! The five wizard steps and their routes

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::OrderError;

/// Position in the order wizard
///
/// Persisted as its number (1..=5) so a reopened order resumes where it was.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    #[default]
    Product = 1,
    Artwork = 2,
    Details = 3,
    Sizes = 4,
    Pdf = 5,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Product,
        WizardStep::Artwork,
        WizardStep::Details,
        WizardStep::Sizes,
        WizardStep::Pdf,
    ];

    pub const FIRST: WizardStep = WizardStep::Product;
    pub const LAST: WizardStep = WizardStep::Pdf;

    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// Route segment, e.g. `"sizes"`
    pub fn route(&self) -> &'static str {
        match self {
            WizardStep::Product => "product",
            WizardStep::Artwork => "artwork",
            WizardStep::Details => "details",
            WizardStep::Sizes => "sizes",
            WizardStep::Pdf => "pdf",
        }
    }

    /// Full route path, e.g. `"/sizes"`
    pub fn path(&self) -> String {
        format!("/{}", self.route())
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::Product => "Select Product",
            WizardStep::Artwork => "Upload Artwork",
            WizardStep::Details => "Add Details",
            WizardStep::Sizes => "Size Tally",
            WizardStep::Pdf => "Generate PDF",
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == number)
    }

    /// Accepts `"sizes"` as well as `"/sizes"`
    pub fn from_route(route: &str) -> Option<Self> {
        let route = route.trim().trim_start_matches('/');
        Self::ALL.into_iter().find(|s| s.route() == route)
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    /// Steps after `self` up to and including `target`
    pub fn steps_until(&self, target: WizardStep) -> impl Iterator<Item = WizardStep> {
        let (from, to) = (self.number(), target.number());
        Self::ALL
            .into_iter()
            .filter(move |s| s.number() > from && s.number() <= to)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = OrderError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or_else(|| OrderError::InvalidStep {
            value: value.to_string(),
        })
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

impl std::str::FromStr for WizardStep {
    type Err = OrderError;

    /// Parses either a step number or a route name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.trim().parse::<u8>() {
            Ok(n) => Self::from_number(n),
            Err(_) => Self::from_route(s),
        };
        parsed.ok_or_else(|| OrderError::InvalidStep {
            value: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_and_routes() {
        assert_eq!(WizardStep::Sizes.number(), 4);
        assert_eq!(WizardStep::Sizes.path(), "/sizes");
        assert_eq!(WizardStep::from_route("/pdf"), Some(WizardStep::Pdf));
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(6), None);
    }

    #[test]
    fn test_next_and_previous_stop_at_the_ends() {
        assert_eq!(WizardStep::Product.previous(), None);
        assert_eq!(WizardStep::Pdf.next(), None);
        assert_eq!(WizardStep::Artwork.next(), Some(WizardStep::Details));
        assert_eq!(WizardStep::Artwork.previous(), Some(WizardStep::Product));
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&WizardStep::Details).unwrap(), "3");
        let parsed: WizardStep = serde_json::from_str("5").unwrap();
        assert_eq!(parsed, WizardStep::Pdf);
        assert!(serde_json::from_str::<WizardStep>("9").is_err());
    }

    #[test]
    fn test_from_str_accepts_numbers_and_routes() {
        assert_eq!("2".parse::<WizardStep>().unwrap(), WizardStep::Artwork);
        assert_eq!("details".parse::<WizardStep>().unwrap(), WizardStep::Details);
        assert!("checkout".parse::<WizardStep>().is_err());
    }

    #[test]
    fn test_steps_until() {
        let steps: Vec<_> = WizardStep::Artwork.steps_until(WizardStep::Pdf).collect();
        assert_eq!(
            steps,
            vec![WizardStep::Details, WizardStep::Sizes, WizardStep::Pdf]
        );
        assert_eq!(WizardStep::Sizes.steps_until(WizardStep::Product).count(), 0);
    }
}

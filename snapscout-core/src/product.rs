use serde::{Deserialize, Serialize};

// Confidence thresholds for the qualitative recommendation. Boundaries belong to the higher tier.
pub const FAVORABLE_THRESHOLD: f64 = 0.8;
pub const WAIT_THRESHOLD: f64 = 0.6;

// Placeholder: there is no price history behind this factor.
pub const AVERAGE_PRICE_FACTOR: f64 = 0.95;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub confidence: f64,
}

impl DetectionResult {
    pub fn recommendation(&self) -> Recommendation {
        Recommendation::from_confidence(self.confidence)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Favorable,
    Wait,
    Unfavorable,
}

impl Recommendation {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= FAVORABLE_THRESHOLD {
            Recommendation::Favorable
        } else if confidence >= WAIT_THRESHOLD {
            Recommendation::Wait
        } else {
            // NaN lands here as well.
            Recommendation::Unfavorable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Favorable => "favorable",
            Recommendation::Wait => "wait",
            Recommendation::Unfavorable => "unfavorable",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            Recommendation::Favorable => {
                "Excellent time to buy! This item is at a favorable price point."
            }
            Recommendation::Wait => {
                "Consider waiting. Prices may drop further in the coming weeks."
            }
            Recommendation::Unfavorable => "Prices are currently high. Wait for better deals.",
        }
    }
}

pub fn format_price(price: f64) -> String {
    let price = if price == 0.0 { 0.0 } else { price };
    format!("${:.2}", price)
}

pub fn average_price(price: f64) -> f64 {
    price * AVERAGE_PRICE_FACTOR
}

/// Everything the product panel shows, derived from a single detection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPanel {
    pub name: String,
    pub brand: String,
    pub price_label: String,
    pub average_price_label: String,
    pub match_label: String,
    pub recommendation: Recommendation,
}

impl ProductPanel {
    pub fn from_detection(d: &DetectionResult) -> Self {
        Self {
            name: d.name.clone(),
            brand: d.brand.clone(),
            price_label: format_price(d.price),
            average_price_label: format_price(average_price(d.price)),
            match_label: format!("{:.0}% Match", d.confidence * 100.0),
            recommendation: d.recommendation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(confidence: f64) -> DetectionResult {
        DetectionResult {
            name: "Widget".into(),
            brand: "Acme".into(),
            price: 19.99,
            confidence,
        }
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(Recommendation::from_confidence(1.0), Recommendation::Favorable);
        assert_eq!(Recommendation::from_confidence(0.8), Recommendation::Favorable);
        assert_eq!(Recommendation::from_confidence(0.7999), Recommendation::Wait);
        assert_eq!(Recommendation::from_confidence(0.6), Recommendation::Wait);
        assert_eq!(Recommendation::from_confidence(0.5999), Recommendation::Unfavorable);
        assert_eq!(Recommendation::from_confidence(0.0), Recommendation::Unfavorable);
    }

    #[test]
    fn tier_sweep_matches_predicate() {
        for i in 0..=1000 {
            let c = i as f64 / 1000.0;
            let expected = if c >= 0.8 {
                Recommendation::Favorable
            } else if c >= 0.6 {
                Recommendation::Wait
            } else {
                Recommendation::Unfavorable
            };
            assert_eq!(Recommendation::from_confidence(c), expected, "confidence {c}");
        }
    }

    #[test]
    fn nan_confidence_is_unfavorable() {
        assert_eq!(Recommendation::from_confidence(f64::NAN), Recommendation::Unfavorable);
    }

    #[test]
    fn panel_for_widget_scenario() {
        let panel = ProductPanel::from_detection(&widget(0.85));
        assert_eq!(panel.recommendation, Recommendation::Favorable);
        assert_eq!(panel.price_label, "$19.99");
        assert_eq!(panel.average_price_label, "$18.99");
        assert_eq!(panel.match_label, "85% Match");
        assert_eq!(panel.name, "Widget");
        assert_eq!(panel.brand, "Acme");
    }

    #[test]
    fn price_formats_two_decimals() {
        assert_eq!(format_price(150.0), "$150.00");
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(142.5), "$142.50");
    }

    #[test]
    fn negative_zero_price_has_no_sign() {
        assert_eq!(format_price(-0.0), "$0.00");
        assert_eq!(format_price(average_price(-0.0)), "$0.00");
    }
}

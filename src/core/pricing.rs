//! Pricing engine - Applies configured role and event discounts to a base price.
//!
//! Discounts stack multiplicatively in the order they are configured. Rules are
//! validated when the configuration is loaded, so pricing itself cannot fail.

/// What a discount rule matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    /// Matches when the buyer holds the target role
    Role,
    /// Matches when the target equals the currently active event
    Event,
}

/// A single percentage discount.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountRule {
    pub kind: DiscountKind,
    /// Role id or event tag
    pub target: String,
    /// Percent off, normally 0 to 100
    pub amount: f64,
}

impl DiscountRule {
    fn matches(&self, buyer_role_ids: &[String], active_event: Option<&str>) -> bool {
        match self.kind {
            DiscountKind::Role => buyer_role_ids.iter().any(|role| *role == self.target),
            DiscountKind::Event => active_event == Some(self.target.as_str()),
        }
    }
}

/// Computes what a buyer pays from an ordered list of discount rules.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    rules: Vec<DiscountRule>,
}

impl PricingEngine {
    #[must_use]
    pub const fn new(rules: Vec<DiscountRule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[DiscountRule] {
        &self.rules
    }

    /// Returns the discounted price, rounded half-up and never below zero.
    #[must_use]
    pub fn effective_price(
        &self,
        base_price: i64,
        buyer_role_ids: &[String],
        active_event: Option<&str>,
    ) -> i64 {
        // Prices are points; f64 is exact well past any realistic value
        #[allow(clippy::cast_precision_loss)]
        let mut price = base_price.max(0) as f64;

        for rule in &self.rules {
            if rule.matches(buyer_role_ids, active_event) {
                price *= 1.0 - rule.amount / 100.0;
            }
        }

        // Cast safety: clamped to non-negative and rounded before truncation
        #[allow(clippy::cast_possible_truncation)]
        let rounded = (price + 0.5).floor().max(0.0) as i64;
        rounded
    }
}

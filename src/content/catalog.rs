//! Built-in content lists
//!
//! The three rotating lists shown on the home screen. They are compiled into
//! the binary and never change at runtime.

use serde::Serialize;

/// A short actionable wellness tip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WellnessTip {
    pub id: u32,
    pub text: &'static str,
}

/// A single nutrition fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthBite {
    pub id: u32,
    pub fact: &'static str,
}

/// A featured food with its key benefits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Spotlight {
    pub id: u32,
    pub name: &'static str,
    pub benefits: &'static [&'static str],
}

/// The three lists the daily selector indexes into.
///
/// Every list must be non-empty. The built-in lists are checked at compile
/// time, and [`Catalog::new`] refuses empty slices for custom catalogs.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    tips: &'static [WellnessTip],
    bites: &'static [HealthBite],
    spotlights: &'static [Spotlight],
}

impl Catalog {
    /// The catalog shipped with the app
    pub const fn builtin() -> Self {
        Self {
            tips: WELLNESS_TIPS,
            bites: HEALTH_BITES,
            spotlights: SPOTLIGHTS,
        }
    }

    /// Build a catalog from custom lists, `None` if any list is empty
    pub fn new(
        tips: &'static [WellnessTip],
        bites: &'static [HealthBite],
        spotlights: &'static [Spotlight],
    ) -> Option<Self> {
        if tips.is_empty() || bites.is_empty() || spotlights.is_empty() {
            return None;
        }
        Some(Self {
            tips,
            bites,
            spotlights,
        })
    }

    pub fn tips(&self) -> &'static [WellnessTip] {
        self.tips
    }

    pub fn bites(&self) -> &'static [HealthBite] {
        self.bites
    }

    pub fn spotlights(&self) -> &'static [Spotlight] {
        self.spotlights
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// Empty lists would make `seed % len` divide by zero.
const _: () = assert!(!WELLNESS_TIPS.is_empty());
const _: () = assert!(!HEALTH_BITES.is_empty());
const _: () = assert!(!SPOTLIGHTS.is_empty());

pub const WELLNESS_TIPS: &[WellnessTip] = &[
    WellnessTip {
        id: 1,
        text: "Practice deep breathing exercises for 5 minutes daily to reduce stress and improve mental clarity.",
    },
    WellnessTip {
        id: 2,
        text: "Drink at least 8 glasses of water today to keep your body hydrated and maintain high energy levels.",
    },
    WellnessTip {
        id: 3,
        text: "Take a 15-minute brisk walk after lunch to aid digestion and clear your mind for the afternoon.",
    },
    WellnessTip {
        id: 4,
        text: "Aim for 7-9 hours of quality sleep tonight to allow your body to repair and fully recharge.",
    },
    WellnessTip {
        id: 5,
        text: "Try a digital detox for one hour before bed to improve sleep quality and reduce eye strain.",
    },
    WellnessTip {
        id: 6,
        text: "Start your day with a simple stretch routine to wake up your muscles and improve blood flow.",
    },
    WellnessTip {
        id: 7,
        text: "Eat a mindful meal without distractions like phones or TV to improve digestion and satisfaction.",
    },
];

pub const HEALTH_BITES: &[HealthBite] = &[
    HealthBite {
        id: 1,
        fact: "Green tea contains antioxidants called catechins that may help boost metabolism and protect against heart disease.",
    },
    HealthBite {
        id: 2,
        fact: "Dark chocolate with 70% cocoa is rich in antioxidants and flavanols that can improve brain function.",
    },
    HealthBite {
        id: 3,
        fact: "Blueberries are one of the most antioxidant-dense foods, helping to protect your body from oxidative stress.",
    },
    HealthBite {
        id: 4,
        fact: "Almonds are packed with vitamin E, magnesium, and fiber, making them a perfect heart-healthy snack.",
    },
    HealthBite {
        id: 5,
        fact: "Apples are rich in fiber and vitamin C, and they also contain antioxidants like vitamin E and polyphenols.",
    },
    HealthBite {
        id: 6,
        fact: "Spinach is loaded with vitamins A, C, and K, as well as iron and calcium for strong bones and immunity.",
    },
    HealthBite {
        id: 7,
        fact: "Turmeric contains curcumin, a powerful anti-inflammatory compound that can help fight chronic inflammation.",
    },
];

pub const SPOTLIGHTS: &[Spotlight] = &[
    Spotlight {
        id: 1,
        name: "Avocados",
        benefits: &[
            "Rich in heart-healthy monounsaturated fats",
            "Contains more potassium than bananas",
            "High in fiber to aid digestion",
        ],
    },
    Spotlight {
        id: 2,
        name: "Blueberries",
        benefits: &[
            "Packed with antioxidants to fight aging",
            "Boosts brain function and memory",
            "Low in calories but high in nutrients",
        ],
    },
    Spotlight {
        id: 3,
        name: "Spinach",
        benefits: &[
            "Excellent source of Iron for energy",
            "High in Calcium for bone health",
            "Supports healthy vision with Vitamin A",
        ],
    },
    Spotlight {
        id: 4,
        name: "Oranges",
        benefits: &[
            "Excellent source of Vitamin C for immunity",
            "Promotes healthy skin and collagen production",
            "Contains antioxidants that fight inflammation",
        ],
    },
    Spotlight {
        id: 5,
        name: "Sweet Potatoes",
        benefits: &[
            "High in Vitamin A for vision and immunity",
            "Contains fiber for gut health",
            "Provides complex carbs for sustained energy",
        ],
    },
    Spotlight {
        id: 6,
        name: "Broccoli",
        benefits: &[
            "Rich in Sulforaphane, a powerful antioxidant",
            "High in Vitamin K for bone health",
            "Supports the body's natural detoxification",
        ],
    },
    Spotlight {
        id: 7,
        name: "Carrots",
        benefits: &[
            "Rich in Beta-carotene for eye health",
            "High in antioxidants for cellular protection",
            "Supports heart health and cholesterol balance",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lists() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.tips().len(), 7);
        assert_eq!(catalog.bites().len(), 7);
        assert_eq!(catalog.spotlights().len(), 7);
        assert!(catalog.spotlights().iter().all(|s| s.benefits.len() == 3));
    }

    #[test]
    fn test_custom_catalog_rejects_empty() {
        assert!(Catalog::new(&[], HEALTH_BITES, SPOTLIGHTS).is_none());
        assert!(Catalog::new(WELLNESS_TIPS, &[], SPOTLIGHTS).is_none());
        assert!(Catalog::new(WELLNESS_TIPS, HEALTH_BITES, &[]).is_none());
        assert!(Catalog::new(&WELLNESS_TIPS[..1], HEALTH_BITES, SPOTLIGHTS).is_some());
    }
}

//! Enumerated categories used by energy and waste records
//!
//! Every category is stored and exchanged by its display label
//! (`"Natural Gas"`, `"Pending Review"`), which is what the forms submit
//! and what the store keeps in its text columns.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Returned when a label does not name any variant of a category
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {label}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub label: String,
}

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in form display order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The display label stored for this variant
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(UnknownLabel {
                        kind: $kind,
                        label: other.to_string(),
                    }),
                }
            }
        }
    };
}

labelled_enum! {
    /// Source of consumed energy
    EnergyType ("energy type") {
        Electricity => "Electricity",
        NaturalGas => "Natural Gas",
        Diesel => "Diesel",
        Solar => "Solar",
        Wind => "Wind",
        Other => "Other",
    }
}

labelled_enum! {
    /// Category of disposed waste
    WasteType ("waste type") {
        Hazardous => "Hazardous",
        NonHazardous => "Non-Hazardous",
        Recyclable => "Recyclable",
        Organic => "Organic",
        Electronic => "Electronic",
    }
}

labelled_enum! {
    /// How a waste stream was disposed of
    DisposalMethod ("disposal method") {
        Landfill => "Landfill",
        Incineration => "Incineration",
        Recycling => "Recycling",
        Composting => "Composting",
        Other => "Other",
    }
}

labelled_enum! {
    /// Regulatory compliance status of a waste record
    ComplianceStatus ("regulatory compliance status") {
        Compliant => "Compliant",
        NonCompliant => "Non-Compliant",
        PendingReview => "Pending Review",
    }
}

impl DisposalMethod {
    /// Methods that keep waste out of landfill and incineration
    pub fn is_diversion(&self) -> bool {
        matches!(self, DisposalMethod::Recycling | DisposalMethod::Composting)
    }
}

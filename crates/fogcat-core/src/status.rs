//! Instance status and lifecycle-action vocabularies.
//!
//! Records carry their status as a plain string; the catalog persists and
//! distributes it without checking transitions. These enums give callers a
//! typed view of the well-known values. Which transitions are legal is up to
//! the infrastructure manager that owns the instance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string that is not part of the expected vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {vocabulary} value: {value}")]
pub struct UnknownVocabulary {
    pub vocabulary: &'static str,
    pub value: String,
}

/// Declares a wire-string vocabulary enum with `as_str`, `Display` and `FromStr`.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVocabulary;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownVocabulary {
                        vocabulary: $label,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

vocabulary! {
    /// Observed status of a deployable-unit or composite-entity instance.
    InstanceStatus, "status" {
        Onboarding => "ONBOARDING",
        Onboarded => "ONBOARDED",
        Running => "RUNNING",
        Stopping => "STOPPING",
        Stopped => "STOPPED",
        Offloading => "OFFLOADING",
        Offloaded => "OFFLOADED",
        Invalid => "INVALID",
        Recovering => "RECOVERING",
    }
}

vocabulary! {
    /// Verbs an infrastructure manager issues to move a unit between states.
    LifecycleAction, "lifecycle action" {
        Define => "DEFINE",
        Configure => "CONFIGURE",
        Clean => "CLEAN",
        Run => "RUN",
        Starting => "STARTING",
        Stop => "STOP",
        Resume => "RESUME",
        Pause => "PAUSE",
        Scale => "SCALE",
        TakeOff => "TAKE_OFF",
        Land => "LAND",
        Migrate => "MIGRATE",
        Undefine => "UNDEFINE",
        Error => "ERROR",
    }
}

//! The rule catalog.
//!
//! Every checkable convention has one [`RuleCode`]. Its [`RuleDef`] carries
//! the severity, the strict-only flag and a description per style version;
//! a rule applies to exactly the versions that have a description.

use crate::config::StyleVersion;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier of one checkable convention.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleCode {
    F2,
    F3,
    F4,
    F5,
    G1,
    O1,
    O3,
    O4,
    C2,
    C1,
    C3,
    H2,
    H3,
    L2,
    L3,
    V3,
    G2,
    G7,
    G8,
    G9,
    F6,
    L6,
    A3,
    #[serde(rename = "implicit_LF")]
    ImplicitLf,
    #[serde(rename = "implicit_L001")]
    ImplicitL001,
    #[serde(rename = "syscall")]
    Syscall,
}

impl RuleCode {
    /// Every rule, in catalog order.
    pub const ALL: [Self; 26] = [
        Self::F2,
        Self::F3,
        Self::F4,
        Self::F5,
        Self::G1,
        Self::O1,
        Self::O3,
        Self::O4,
        Self::C2,
        Self::C1,
        Self::C3,
        Self::H2,
        Self::H3,
        Self::L2,
        Self::L3,
        Self::V3,
        Self::G2,
        Self::G7,
        Self::G8,
        Self::G9,
        Self::F6,
        Self::L6,
        Self::A3,
        Self::ImplicitLf,
        Self::ImplicitL001,
        Self::Syscall,
    ];

    /// The version-free code used in output and suppression lists.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::F2 => "F2",
            Self::F3 => "F3",
            Self::F4 => "F4",
            Self::F5 => "F5",
            Self::G1 => "G1",
            Self::O1 => "O1",
            Self::O3 => "O3",
            Self::O4 => "O4",
            Self::C2 => "C2",
            Self::C1 => "C1",
            Self::C3 => "C3",
            Self::H2 => "H2",
            Self::H3 => "H3",
            Self::L2 => "L2",
            Self::L3 => "L3",
            Self::V3 => "V3",
            Self::G2 => "G2",
            Self::G7 => "G7",
            Self::G8 => "G8",
            Self::G9 => "G9",
            Self::F6 => "F6",
            Self::L6 => "L6",
            Self::A3 => "A3",
            Self::ImplicitLf => "implicit_LF",
            Self::ImplicitL001 => "implicit_L001",
            Self::Syscall => "syscall",
        }
    }

    /// Looks up the definition of this rule.
    #[must_use]
    pub fn def(self) -> RuleDef {
        use Severity::{Info, Major, Minor};

        match self {
            Self::F2 => RuleDef::all(self, Major, "function name should be in snake_case"),
            Self::F3 => RuleDef::per_version(
                self,
                Major,
                "too many columns (CS2020)",
                "too many columns (CS2021)",
            ),
            Self::F4 => RuleDef::per_version(
                self,
                Major,
                "too long function (should be <=20 lines) (CS2020)",
                "too long function (should be <20 lines) (CS2021)",
            ),
            Self::F5 => RuleDef::all(self, Major, "too many arguments or missing void"),
            Self::G1 => RuleDef::per_version(
                self,
                Major,
                "bad or missing header (CS2020)",
                "bad or missing header (CS2021)",
            ),
            Self::O1 => RuleDef::all(
                self,
                Major,
                "delivery folder should not contain unnecessary files",
            ),
            Self::O3 => RuleDef::all(self, Major, "too many functions in file"),
            Self::O4 => RuleDef::all(
                self,
                Major,
                "file or folder should be named in snake_case",
            ),
            Self::C2 => RuleDef::all(
                self,
                Major,
                "only header files should contain macros and static inline functions",
            ),
            Self::C1 => RuleDef::all(self, Minor, "probably too many conditions nested"),
            Self::C3 => RuleDef::all(self, Minor, "goto is discouraged"),
            Self::H2 => RuleDef::all(self, Minor, "no inclusion guard found"),
            Self::H3 => RuleDef::only(
                self,
                Minor,
                StyleVersion::Cs2020,
                "macros should not be used for constants and should only match one statement (CS2020)",
            )
            .strict_only(),
            Self::L2 => RuleDef::all(self, Minor, "bad indentation"),
            Self::L3 => RuleDef::all(self, Minor, "misplaced or missing space"),
            Self::V3 => RuleDef::all(self, Minor, "pointer symbol is not attached to the name"),
            Self::G2 => RuleDef::all(
                self,
                Minor,
                "only one empty line should separate the implementations of functions",
            ),
            Self::G7 => RuleDef::only(
                self,
                Minor,
                StyleVersion::Cs2021,
                "line endings must be done in UNIX style (LF) (CS2021)",
            ),
            Self::G8 => RuleDef::only(self, Minor, StyleVersion::Cs2021, "trailing space (CS2021)"),
            Self::G9 => RuleDef::only(
                self,
                Minor,
                StyleVersion::Cs2021,
                "no more than one single trailing line must be present (CS2021)",
            ),
            Self::F6 => RuleDef::all(self, Minor, "no comment inside a function"),
            Self::L6 => RuleDef::all(
                self,
                Minor,
                "one line break should be present to separate implementations from function remainder",
            ),
            Self::A3 => RuleDef::only(
                self,
                Info,
                StyleVersion::Cs2021,
                "one single trailing line must be present",
            ),
            Self::ImplicitLf => RuleDef::only(
                self,
                Info,
                StyleVersion::Cs2020,
                "line endings must be done in UNIX style (LF) (CS2020)",
            ),
            Self::ImplicitL001 => {
                RuleDef::only(self, Info, StyleVersion::Cs2020, "trailing space (CS2020)")
            }
            Self::Syscall => RuleDef::all(self, Info, "suspicious system call found"),
        }
    }
}

impl std::fmt::Display for RuleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a code that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule code {0:?}")]
pub struct UnknownRuleCode(pub String);

impl FromStr for RuleCode {
    type Err = UnknownRuleCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownRuleCode(s.to_string()))
    }
}

/// Static definition of one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDef {
    /// Rule code.
    pub code: RuleCode,
    /// Severity of every diagnostic of this rule.
    pub severity: Severity,
    /// Reported only in strict mode.
    pub strict_only: bool,
    cs2020: Option<&'static str>,
    cs2021: Option<&'static str>,
}

impl RuleDef {
    const fn all(code: RuleCode, severity: Severity, description: &'static str) -> Self {
        Self::per_version(code, severity, description, description)
    }

    const fn per_version(
        code: RuleCode,
        severity: Severity,
        cs2020: &'static str,
        cs2021: &'static str,
    ) -> Self {
        Self {
            code,
            severity,
            strict_only: false,
            cs2020: Some(cs2020),
            cs2021: Some(cs2021),
        }
    }

    const fn only(
        code: RuleCode,
        severity: Severity,
        version: StyleVersion,
        description: &'static str,
    ) -> Self {
        let (cs2020, cs2021) = match version {
            StyleVersion::Cs2020 => (Some(description), None),
            StyleVersion::Cs2021 => (None, Some(description)),
        };
        Self {
            code,
            severity,
            strict_only: false,
            cs2020,
            cs2021,
        }
    }

    const fn strict_only(mut self) -> Self {
        self.strict_only = true;
        self
    }

    /// Description under `version`, or `None` if the rule does not apply.
    #[must_use]
    pub fn description(&self, version: StyleVersion) -> Option<&'static str> {
        match version {
            StyleVersion::Cs2020 => self.cs2020,
            StyleVersion::Cs2021 => self.cs2021,
        }
    }

    /// Whether the rule exists under `version`.
    #[must_use]
    pub fn applies_to(&self, version: StyleVersion) -> bool {
        self.description(version).is_some()
    }

    /// The versions this rule applies to.
    #[must_use]
    pub fn style_versions(&self) -> Vec<StyleVersion> {
        StyleVersion::ALL
            .into_iter()
            .filter(|v| self.applies_to(*v))
            .collect()
    }
}

/// Returns every rule definition, in catalog order.
#[must_use]
pub fn catalog() -> Vec<RuleDef> {
    RuleCode::ALL.into_iter().map(RuleCode::def).collect()
}

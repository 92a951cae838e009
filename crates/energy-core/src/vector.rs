//! Energy vectors tracked per year.

use crate::format::Locale;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the seven tracked energy/utility categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vector {
    Electricity,
    Gas,
    Fuel,
    Biogas,
    Util1,
    Util2,
    Process,
}

impl Vector {
    /// All vectors in display order.
    pub const ALL: [Vector; 7] = [
        Vector::Electricity,
        Vector::Gas,
        Vector::Fuel,
        Vector::Biogas,
        Vector::Util1,
        Vector::Util2,
        Vector::Process,
    ];

    /// Wire key used in the `totals` object.
    pub fn key(self) -> &'static str {
        match self {
            Vector::Electricity => "electricity",
            Vector::Gas => "gas",
            Vector::Fuel => "fuel",
            Vector::Biogas => "biogas",
            Vector::Util1 => "util1",
            Vector::Util2 => "util2",
            Vector::Process => "process",
        }
    }

    pub fn from_key(key: &str) -> Option<Vector> {
        Vector::ALL.into_iter().find(|v| v.key() == key)
    }

    /// Priced counterpart, if a unit price is collected for this vector.
    pub fn priced(self) -> Option<PricedVector> {
        match self {
            Vector::Electricity => Some(PricedVector::Electricity),
            Vector::Gas => Some(PricedVector::Gas),
            Vector::Fuel => Some(PricedVector::Fuel),
            Vector::Biogas => Some(PricedVector::Biogas),
            Vector::Util1 | Vector::Util2 | Vector::Process => None,
        }
    }

    /// Default display label. The two utility slots can be renamed per
    /// document, see [`crate::YearStore::series_label`].
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Vector::Electricity, Locale::Fr) => "Électricité",
            (Vector::Electricity, Locale::En) => "Electricity",
            (Vector::Gas, Locale::Fr) => "Gaz",
            (Vector::Gas, Locale::En) => "Gas",
            (Vector::Fuel, _) => "Fuel",
            (Vector::Biogas, Locale::Fr) => "Biogaz",
            (Vector::Biogas, Locale::En) => "Biogas",
            (Vector::Util1, Locale::Fr) => "Utilité 1",
            (Vector::Util1, Locale::En) => "Utility 1",
            (Vector::Util2, Locale::Fr) => "Utilité 2",
            (Vector::Util2, Locale::En) => "Utility 2",
            (Vector::Process, _) => "Process",
        }
    }

    /// Unit of the entered quantity; the utility slots have none.
    pub fn unit(self) -> Option<&'static str> {
        match self {
            Vector::Electricity | Vector::Gas | Vector::Biogas => Some("kWh"),
            Vector::Fuel => Some("L"),
            Vector::Process => Some("kgCO₂"),
            Vector::Util1 | Vector::Util2 => None,
        }
    }

    /// Chart colour.
    pub fn color(self) -> &'static str {
        match self {
            Vector::Electricity => "#6d28d9",
            Vector::Gas => "#2563eb",
            Vector::Fuel => "#f59e0b",
            Vector::Biogas => "#10b981",
            Vector::Util1 => "#14b8a6",
            Vector::Util2 => "#06b6d4",
            Vector::Process => "#ef4444",
        }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The four vectors for which a unit price is collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricedVector {
    Electricity,
    Gas,
    Fuel,
    Biogas,
}

impl PricedVector {
    pub const ALL: [PricedVector; 4] = [
        PricedVector::Electricity,
        PricedVector::Gas,
        PricedVector::Fuel,
        PricedVector::Biogas,
    ];

    pub fn vector(self) -> Vector {
        match self {
            PricedVector::Electricity => Vector::Electricity,
            PricedVector::Gas => Vector::Gas,
            PricedVector::Fuel => Vector::Fuel,
            PricedVector::Biogas => Vector::Biogas,
        }
    }

    /// Position in [`PricedVector::ALL`].
    pub fn index(self) -> usize {
        match self {
            PricedVector::Electricity => 0,
            PricedVector::Gas => 1,
            PricedVector::Fuel => 2,
            PricedVector::Biogas => 3,
        }
    }

    pub fn key(self) -> &'static str {
        self.vector().key()
    }
}

impl From<PricedVector> for Vector {
    fn from(p: PricedVector) -> Self {
        p.vector()
    }
}

impl fmt::Display for PricedVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

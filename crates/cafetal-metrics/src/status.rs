//! Status codes, due dates and lot expiry

use chrono::NaiveDate;
use serde::Serialize;

/// Days before expiry at which a lot is flagged
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// Spanish label for a backend status code; unknown codes pass through
#[must_use]
pub fn translate_status(code: &str) -> &str {
    match code {
        "PLANNED" => "Planificado",
        "IN_PROCESS" => "En Proceso",
        "DONE" => "Terminado",
        "CANCELED" => "Cancelado",
        "PENDING" => "Pendiente",
        "APPROVED" => "Aprobado",
        "REJECTED" => "Rechazado",
        "IN_TRANSIT" => "En Tránsito",
        "DELIVERED" => "Entregado",
        "OPEN" => "Abierto",
        "PAID" => "Pagado",
        "PARTIAL" => "Parcial",
        "OVERDUE" => "Vencido",
        "ACTIVE" => "Activo",
        "INACTIVE" => "Inactivo",
        other => other,
    }
}

/// Whole days past `due`, 0 when not yet due
#[must_use]
pub fn days_overdue(due: NaiveDate, today: NaiveDate) -> i64 {
    (today - due).num_days().max(0)
}

/// Shelf-life state of a lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// Past its expiry date
    Expired,
    /// Expires within [`EXPIRY_WARNING_DAYS`]
    Expiring,
    /// Fine
    Valid,
}

impl ExpiryStatus {
    /// Spanish label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Expired => "Vencido",
            Self::Expiring => "Por vencer",
            Self::Valid => "Vigente",
        }
    }
}

/// Classify a lot by days remaining until `expiry`
#[must_use]
pub fn expiry_status(expiry: NaiveDate, today: NaiveDate) -> ExpiryStatus {
    let remaining = (expiry - today).num_days();
    if remaining < 0 {
        ExpiryStatus::Expired
    } else if remaining <= EXPIRY_WARNING_DAYS {
        ExpiryStatus::Expiring
    } else {
        ExpiryStatus::Valid
    }
}

/// Cupping-score grade of a quality test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CuppingGrade {
    /// 90 and above
    Excellent,
    /// 85 to 90
    VeryGood,
    /// 75 to 85
    Good,
    /// Below 75
    Regular,
}

impl CuppingGrade {
    /// Grade a cupping score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 85.0 {
            Self::VeryGood
        } else if score >= 75.0 {
            Self::Good
        } else {
            Self::Regular
        }
    }

    /// Spanish label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excelente",
            Self::VeryGood => "Muy Bueno",
            Self::Good => "Bueno",
            Self::Regular => "Regular",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn translates_known_codes() {
        assert_eq!(translate_status("IN_PROCESS"), "En Proceso");
        assert_eq!(translate_status("OVERDUE"), "Vencido");
        assert_eq!(translate_status("ARCHIVED"), "ARCHIVED");
    }

    #[test]
    fn overdue_days() {
        assert_eq!(days_overdue(date(2024, 4, 1), date(2024, 4, 11)), 10);
        assert_eq!(days_overdue(date(2024, 4, 20), date(2024, 4, 11)), 0);
    }

    #[test]
    fn expiry_windows() {
        let today = date(2024, 5, 1);
        assert_eq!(expiry_status(date(2024, 4, 30), today), ExpiryStatus::Expired);
        assert_eq!(expiry_status(date(2024, 5, 1), today), ExpiryStatus::Expiring);
        assert_eq!(expiry_status(date(2024, 5, 31), today), ExpiryStatus::Expiring);
        assert_eq!(expiry_status(date(2024, 6, 1), today), ExpiryStatus::Valid);
        assert_eq!(ExpiryStatus::Expiring.label(), "Por vencer");
    }

    #[test]
    fn cupping_grades() {
        assert_eq!(CuppingGrade::from_score(91.0), CuppingGrade::Excellent);
        assert_eq!(CuppingGrade::from_score(85.0).label(), "Muy Bueno");
        assert_eq!(CuppingGrade::from_score(60.0), CuppingGrade::Regular);
    }
}

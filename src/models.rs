//! Request and response types for the HireHub API.
//!
//! These mirror the backend's wire schemas field for field. Business data
//! lives server-side; the client only ships it back and forth.

use serde::{Deserialize, Serialize};

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserOut {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub subscription_type: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

// ============================================================================
// Salary calculator
// ============================================================================

/// KPI bonus payout cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiPeriod {
    Quarter,
    Halfyear,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalaryRequest {
    /// Base monthly salary before coefficients
    pub salary: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_bonus: Option<f64>,
    /// Regional coefficient multiplier
    pub rk_rate: f64,
    /// Northern allowance, percent
    pub sn_percentage: f64,
    pub kpi_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpi_percentage: Option<f64>,
    pub kpi_period: KpiPeriod,
}

/// One row of the 12-month breakdown. Amounts arrive pre-formatted for
/// display; the backend owns the progressive tax math.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthResult {
    pub month: String,
    pub income: String,
    pub kpi_bonus: String,
    pub kpi_note: String,
    pub tax: String,
    pub net_income: String,
    pub tax_info: String,
    pub rate_details: String,
    pub cumulative_income: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalarySummary {
    pub annual_income: String,
    pub annual_tax: String,
    pub annual_net_income: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalaryResponse {
    pub months: Vec<MonthResult>,
    pub summary: SalarySummary,
}

// ============================================================================
// Job description generator
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct JobGeneratorRequest {
    pub job_title: String,
    pub company: String,
    pub tasks: String,
    pub requirements: String,
    pub conditions: String,
}

/// The generator reports failures in-band rather than by status code,
/// so both fields are optional and at most one is set.
#[derive(Debug, Clone, Deserialize)]
pub struct JobGeneratorResponse {
    pub result: Option<String>,
    pub error: Option<String>,
}

// ============================================================================
// History and modules
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryItem {
    pub id: i64,
    pub module_name: String,
    pub query: String,
    pub response: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryCreate {
    pub module_name: String,
    pub query: String,
    pub response: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleInfo {
    pub name: String,
    pub path: String,
    pub description: Option<String>,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kpi_period_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&KpiPeriod::Quarter).unwrap(), "\"quarter\"");
        assert_eq!(serde_json::to_string(&KpiPeriod::Halfyear).unwrap(), "\"halfyear\"");
    }

    #[test]
    fn salary_request_omits_unset_options() {
        let request = SalaryRequest {
            salary: 100_000.0,
            monthly_bonus: None,
            rk_rate: 1.3,
            sn_percentage: 30.0,
            kpi_enabled: false,
            kpi_percentage: None,
            kpi_period: KpiPeriod::Quarter,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("monthly_bonus").is_none());
        assert!(json.get("kpi_percentage").is_none());
        assert_eq!(json["rk_rate"], 1.3);
    }

    #[test]
    fn parses_history_item() {
        let json = r#"{"id":7,"module_name":"calculator","query":"{}","response":"{}","timestamp":"2026-01-12T10:00:00"}"#;
        let item: HistoryItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.module_name, "calculator");
    }
}

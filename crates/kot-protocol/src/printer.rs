use serde::{Deserialize, Serialize};

/// Overall kitchen printer connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterHealthStatus {
    Online,
    Offline,
    #[default]
    NotConfigured,
}

/// One configured kitchen printer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Aggregate printer health reported alongside each kitchen view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrinterHealth {
    #[serde(default)]
    pub status: PrinterHealthStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub printers: Vec<PrinterRecord>,
}

/// Severity of a banner shown above the ticket board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterBanner {
    pub level: BannerLevel,
    pub message: String,
}

impl PrinterHealth {
    /// Banner to display for this health state, if any.
    pub fn banner(&self) -> Option<PrinterBanner> {
        let (level, fallback) = match self.status {
            PrinterHealthStatus::Online => return None,
            PrinterHealthStatus::Offline => (BannerLevel::Error, "Kitchen printer is offline"),
            PrinterHealthStatus::NotConfigured => {
                (BannerLevel::Warning, "No kitchen printer configured")
            }
        };
        let message = if self.message.is_empty() {
            fallback.to_string()
        } else {
            self.message.clone()
        };
        Some(PrinterBanner { level, message })
    }

    pub fn default_printer(&self) -> Option<&PrinterRecord> {
        self.printers.iter().find(|p| p.is_default)
    }

    pub fn disconnected(&self) -> impl Iterator<Item = &PrinterRecord> {
        self.printers.iter().filter(|p| !p.connected)
    }
}

/// Print outcome counts, recomputed by the server on every poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrintStats {
    pub total: u32,
    pub printed: u32,
    pub failed: u32,
    pub no_printer: u32,
    pub pending: u32,
}

/// Inner result of a test-print request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterTestResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<PrinterTestDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterTestDetails {
    #[serde(default)]
    pub address: String,
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::expiry::{classify, ExpiryStatus};
use crate::models::Product;

/// Overview counts. `expired + expiring_soon + valid == total`, always.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total: usize,
    pub expired: usize,
    pub expiring_soon: usize,
    pub valid: usize,
}

/// One slice of the status chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSlice {
    pub status: ExpiryStatus,
    pub label: &'static str,
    pub value: usize,
    pub color: &'static str,
}

impl ProductStats {
    pub fn count(&self, status: ExpiryStatus) -> usize {
        match status {
            ExpiryStatus::Expired => self.expired,
            ExpiryStatus::ExpiringSoon => self.expiring_soon,
            ExpiryStatus::Valid => self.valid,
        }
    }

    fn bump(&mut self, status: ExpiryStatus) {
        match status {
            ExpiryStatus::Expired => self.expired += 1,
            ExpiryStatus::ExpiringSoon => self.expiring_soon += 1,
            ExpiryStatus::Valid => self.valid += 1,
        }
    }

    /// Chart series: Expired, Expiring Soon, Valid - empty buckets left out
    pub fn chart_data(&self) -> Vec<ChartSlice> {
        ExpiryStatus::all()
            .into_iter()
            .map(|status| ChartSlice {
                status,
                label: status.label(),
                value: self.count(status),
                color: status.color_code(),
            })
            .filter(|slice| slice.value > 0)
            .collect()
    }
}

/// Count products per status, all classified against the same `now`
pub fn aggregate(products: &[Product], now: NaiveDateTime) -> ProductStats {
    let mut stats = ProductStats {
        total: products.len(),
        ..ProductStats::default()
    };

    for product in products {
        stats.bump(classify(product.expiry_date, now).status);
    }

    stats
}
